use memdb::*;

fn main() -> Result<()> {
    println!("In-Memory Database Demo\n");

    // Create DB
    let mut db = Database::new();

    // Create table "users" through the API
    let schema = Schema::new(vec![
        Column::new("id".into(), DataType::Int32)
            .with_attributes(Attributes::KEY | Attributes::AUTOINCREMENT),
        Column::new("name".into(), DataType::Text).with_width(32),
        Column::new("age".into(), DataType::Int32),
    ])?;
    db.create_table("users".into(), schema)?;
    println!("Created table 'users'");

    // Insert data
    println!("Inserting data...");
    {
        let table = db
            .get_table_mut("users")
            .ok_or_else(|| Error::TableNotFound("users".into()))?;

        table.insert_named(vec![
            ("name".into(), Value::text("Alice")?),
            ("age".into(), Value::Int32(30)),
        ])?;
        table.insert_slots(vec![None, Some(Value::text("Bob")?), None])?;
        println!("Inserted 2 rows\n");
    }

    // The same through statements
    db.execute("insert (name = \"Charlie\", age = 25) to users")?;
    db.execute("update users set age = 41 where name == \"Bob\"")?;

    println!("{}\n", db.query("select * from users")?);

    // Expressions, nested selects and errors
    let older = db.query("select name from (select name, age from users where age > 26) where age < 40")?;
    println!("Between 27 and 39:\n{older}\n");

    match db.execute("insert (0, \"Dup\", 1) to users") {
        Ok(_) => println!("unexpected success"),
        Err(e) => println!("Rejected: {e}"),
    }
    match db.query("select name from users where age / 0 == 1") {
        Ok(_) => println!("unexpected success"),
        Err(e) => println!("Rejected: {e}\n"),
    }

    // List tables
    println!("Tables in database:");
    for table_name in db.list_tables() {
        println!("  - {}", table_name);
    }

    Ok(())
}
