use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use memdb::{Database, Value};
use std::hint::black_box;

fn setup_populated_db(n: usize) -> Database {
    let mut db = Database::new();

    db.execute("create table users (id: int32, name: string[16], age: int32, active: bool)")
        .unwrap();

    let table = db.get_table_mut("users").unwrap();

    for i in 0..n {
        let row = vec![
            Value::Int32(i as i32),
            Value::text(&format!("user{i}")).unwrap(),
            Value::Int32((i % 100) as i32),
            Value::Bool(i % 2 == 0),
        ];
        table.insert(row).unwrap();
    }
    db
}

fn bench_insert_sql(c: &mut Criterion) {
    let mut group = c.benchmark_group("Insert_SQL_Pipeline");
    group.bench_function("insert_single_row_sql", |b| {
        let mut db = Database::new();
        db.execute("create table tests (id: int32)").unwrap();
        b.iter(|| {
            db.execute(black_box("insert (42) to tests")).unwrap();
        });
    });
    group.bench_function("insert_single_row_autoincrement", |b| {
        let mut db = Database::new();
        db.execute("create table tests ({key, autoincrement} id: int32, v: int32)")
            .unwrap();
        b.iter(|| {
            db.execute(black_box("insert (v = 42) to tests")).unwrap();
        });
    });
    group.finish();
}

fn bench_select_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("Select_Where_Performance");

    for n in [1000, 10000].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(n), n, |b, &n| {
            let db = setup_populated_db(n);
            b.iter(|| {
                let res = db.query("select * from users where age == 42").unwrap();
                black_box(res);
            });
        });
    }
    group.finish();
}

fn bench_expression_parsing(c: &mut Criterion) {
    c.bench_function("parse_nested_expression", |b| {
        b.iter(|| {
            memdb::Expression::parse(black_box(
                "(age + 1) * 2 >= 40 && (name == \"user7\" || !active) && id % 3 != 0",
            ))
            .unwrap()
        });
    });
}

fn bench_update_performance(c: &mut Criterion) {
    let mut group = c.benchmark_group("Update_Performance");

    for n in [1000, 10000].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(n), n, |b, &n| {
            b.iter_with_setup(
                || setup_populated_db(n),
                |mut db| {
                    db.execute("update users set age = age + 1 where active == true")
                        .unwrap();
                    black_box(db);
                },
            );
        });
    }
    group.finish();
}

fn bench_delete_performance(c: &mut Criterion) {
    let mut group = c.benchmark_group("Delete_Performance");

    for n in [1000, 10000].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(n), n, |b, &n| {
            b.iter_with_setup(
                || setup_populated_db(n),
                |mut db| {
                    db.execute("delete users where age > 90").unwrap();
                    black_box(db);
                },
            );
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_insert_sql,
    bench_select_scaling,
    bench_expression_parsing,
    bench_update_performance,
    bench_delete_performance
);
criterion_main!(benches);
