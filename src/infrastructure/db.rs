use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, Statement,
};

/// Table definitions, in creation order.
///
/// `collections` is created before `products` even though it references it
/// (featured product): SQLite resolves foreign keys when rows are written, not
/// when tables are declared.
const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS promotions (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        description TEXT NOT NULL,
        discount REAL NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS collections (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title TEXT NOT NULL,
        featured_product_id INTEGER,
        FOREIGN KEY (featured_product_id) REFERENCES products(id) ON DELETE SET NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS products (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title TEXT NOT NULL,
        slug TEXT NOT NULL DEFAULT '-',
        description TEXT NOT NULL,
        unit_price TEXT NOT NULL,
        inventory INTEGER NOT NULL,
        last_update TEXT NOT NULL,
        collection_id INTEGER NOT NULL,
        FOREIGN KEY (collection_id) REFERENCES collections(id) ON DELETE RESTRICT
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS product_promotions (
        product_id INTEGER NOT NULL,
        promotion_id INTEGER NOT NULL,
        PRIMARY KEY (product_id, promotion_id),
        FOREIGN KEY (product_id) REFERENCES products(id) ON DELETE CASCADE ON UPDATE CASCADE,
        FOREIGN KEY (promotion_id) REFERENCES promotions(id) ON DELETE CASCADE ON UPDATE CASCADE
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS items (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS customers (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        given_name TEXT NOT NULL,
        last_name TEXT NOT NULL,
        email TEXT NOT NULL UNIQUE,
        phone TEXT NOT NULL,
        birth_date TEXT,
        membership TEXT NOT NULL DEFAULT 'B' CHECK (membership IN ('B', 'S', 'G'))
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS orders (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        placed_at TEXT NOT NULL,
        payment_status TEXT NOT NULL DEFAULT 'P' CHECK (payment_status IN ('P', 'C', 'F')),
        customer_id INTEGER NOT NULL,
        FOREIGN KEY (customer_id) REFERENCES customers(id) ON DELETE RESTRICT
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS addresses (
        customer_id INTEGER PRIMARY KEY NOT NULL,
        street TEXT NOT NULL,
        city TEXT NOT NULL,
        FOREIGN KEY (customer_id) REFERENCES customers(id) ON DELETE CASCADE
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS order_items (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        order_id INTEGER NOT NULL,
        product_id INTEGER NOT NULL,
        quantity INTEGER NOT NULL CHECK (quantity >= 0 AND quantity <= 32767),
        unit_price TEXT NOT NULL,
        FOREIGN KEY (order_id) REFERENCES orders(id) ON DELETE RESTRICT,
        FOREIGN KEY (product_id) REFERENCES products(id) ON DELETE RESTRICT
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS carts (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        created_at TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS cart_items (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        cart_id INTEGER NOT NULL,
        product_id INTEGER NOT NULL,
        quantity INTEGER NOT NULL CHECK (quantity >= 0 AND quantity <= 32767),
        FOREIGN KEY (cart_id) REFERENCES carts(id) ON DELETE CASCADE,
        FOREIGN KEY (product_id) REFERENCES products(id) ON DELETE CASCADE
    )
    "#,
];

const INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_collections_featured_product_id ON collections(featured_product_id)",
    "CREATE INDEX IF NOT EXISTS idx_products_collection_id ON products(collection_id)",
    "CREATE INDEX IF NOT EXISTS idx_products_slug ON products(slug)",
    "CREATE INDEX IF NOT EXISTS idx_product_promotions_promotion_id ON product_promotions(promotion_id)",
    "CREATE INDEX IF NOT EXISTS idx_orders_customer_id ON orders(customer_id)",
    "CREATE INDEX IF NOT EXISTS idx_order_items_order_id ON order_items(order_id)",
    "CREATE INDEX IF NOT EXISTS idx_order_items_product_id ON order_items(product_id)",
    // One line per product per cart
    "CREATE UNIQUE INDEX IF NOT EXISTS idx_cart_items_cart_product ON cart_items(cart_id, product_id)",
    "CREATE INDEX IF NOT EXISTS idx_cart_items_product_id ON cart_items(product_id)",
];

pub async fn init_db(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(database_url.to_owned());
    if database_url.contains(":memory:") {
        // Every pooled connection would otherwise get its own empty database
        options.max_connections(1).min_connections(1);
    }

    let db = Database::connect(options).await?;

    // sqlx opens every pooled SQLite connection with foreign_keys on; this
    // only restates it for the connection running the migrations
    execute(&db, "PRAGMA foreign_keys = ON").await?;

    run_migrations(&db).await?;

    tracing::info!("Database ready ({} tables)", SCHEMA.len());
    Ok(db)
}

async fn run_migrations(db: &DatabaseConnection) -> Result<(), DbErr> {
    for sql in SCHEMA.iter().chain(INDEXES) {
        execute(db, sql).await?;
    }
    Ok(())
}

async fn execute(db: &DatabaseConnection, sql: &str) -> Result<(), DbErr> {
    db.execute(Statement::from_string(db.get_database_backend(), sql.to_owned()))
        .await?;
    Ok(())
}
