use criterion::{criterion_group, criterion_main, Criterion};
use serde_json::Value;

use rowset_engine::expr::{ArrayAgg, As, Asc, Equals, Ident};
use rowset_engine::{from, LeftJoin, Table};

fn users(count: usize) -> Vec<Value> {
    (0..count)
        .map(|i| serde_json::json!({"id": i, "name": format!("user-{i:04}")}))
        .collect()
}

fn hobbies(count: usize) -> Vec<Value> {
    (0..count)
        .map(|i| serde_json::json!({"id": i, "name": format!("hobby-{i:02}")}))
        .collect()
}

fn user_hobbies(count: usize, users: usize, hobbies: usize) -> Vec<Value> {
    (0..count)
        .map(|i| serde_json::json!({"user_id": i % users, "hobby_id": i % hobbies}))
        .collect()
}

fn run_pipeline(users: &Table, user_hobbies: &Table, hobbies: &Table) -> Table {
    users
        .clone()
        .join(&[
            &LeftJoin::new(
                user_hobbies.clone(),
                Equals::new(Ident::new("users.id"), Ident::new("uh.user_id")),
            ),
            &LeftJoin::new(
                hobbies.clone(),
                Equals::new(Ident::new("hobbies.id"), Ident::new("uh.hobby_id")),
            ),
        ])
        .group_by(&[&Ident::new("users.name")])
        .select(&[
            &As::new("name", Ident::new("users.name")),
            &As::new("hobbies", ArrayAgg::new(Ident::new("hobbies.name"))),
        ])
        .order_by(&[&Asc::new(Ident::new("name"))])
        .limit(10)
        .into_table()
}

fn bench_pipeline(c: &mut Criterion) {
    let users = from(&users(200)).alias("users");
    let user_hobbies = from(&user_hobbies(600, 200, 40)).alias("uh");
    let hobbies = from(&hobbies(40)).alias("hobbies");

    c.bench_function("join_group_select_order", |b| {
        b.iter(|| run_pipeline(&users, &user_hobbies, &hobbies))
    });
}

fn bench_ingest(c: &mut Criterion) {
    let rows = users(1000);
    c.bench_function("ingest_1k_rows", |b| b.iter(|| from(&rows)));
}

criterion_group!(benches, bench_pipeline, bench_ingest);
criterion_main!(benches);
