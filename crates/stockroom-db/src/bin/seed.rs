//! # Demo Seeder
//!
//! Fills an empty database with a demo shelf and, optionally, some sales.
//!
//! ```bash
//! cargo run -p stockroom-db --bin seed                       # ./stockroom_dev.db, no sales
//! cargo run -p stockroom-db --bin seed -- ./data/shop.db 40  # 40 sales as well
//! ```
//!
//! Every category appears on the shelf and several lines start below
//! their threshold, so the low-stock view has something to show. Sales take
//! one to three units at list price; a line that runs dry is skipped, which
//! leaves the seeded data consistent with the stock rules.

use std::env;
use stockroom_core::{Category, Money, NewItem};
use stockroom_db::{Database, DbConfig, DbError};

const DEFAULT_DB: &str = "./stockroom_dev.db";

/// (name, category, quantity, price in whole naira, min_stock)
const SHELF: &[(&str, Category, i64, i64, i64)] = &[
    ("Chicken", Category::Protein, 12, 3500, 5),
    ("Beef", Category::Protein, 8, 4200, 5),
    ("Titus Fish", Category::Protein, 3, 2800, 4),
    ("Eggs (crate)", Category::Protein, 20, 3000, 6),
    ("Tomatoes", Category::Perishables, 25, 900, 10),
    ("Pepper (ata rodo)", Category::Perishables, 6, 1200, 5),
    ("Onions", Category::Perishables, 30, 700, 10),
    ("Plantain", Category::Perishables, 4, 1500, 5),
    ("Orange Juice 1L", Category::Juice, 24, 1250, 12),
    ("Pineapple Juice 1L", Category::Juice, 9, 1300, 12),
    ("Zobo", Category::Juice, 15, 500, 6),
    ("Curry", Category::Spices, 400, 3, 100),
    ("Thyme", Category::Spices, 350, 3, 100),
    ("Crayfish", Category::Spices, 80, 6, 100),
    ("Rice", Category::Groceries, 50, 1100, 10),
    ("Beans", Category::Groceries, 40, 1300, 10),
    ("Garri", Category::Groceries, 60, 600, 15),
    ("Semovita", Category::Groceries, 2, 1400, 5),
    ("Nylon bags", Category::Other, 500, 10, 50),
    ("Matches", Category::Other, 3, 50, 10),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = env::args().skip(1);
    let db_path = args.next().unwrap_or_else(|| DEFAULT_DB.to_string());
    let sales: usize = match args.next() {
        Some(n) => n.parse().map_err(|_| format!("sale count must be a number, got {n:?}"))?,
        None => 0,
    };

    let db = Database::new(DbConfig::new(&db_path)).await?;
    println!("Seeding {db_path}");

    let existing = db.items().count().await?;
    if existing > 0 {
        println!("{existing} items already stocked, nothing to do. Remove the file to reseed.");
        db.close().await;
        return Ok(());
    }

    let mut stocked = Vec::with_capacity(SHELF.len());
    for &(name, category, quantity, naira, min_stock) in SHELF {
        let item = NewItem::new(name, category, quantity, Money::from_major(naira)).with_min_stock(min_stock);
        stocked.push(db.items().insert(&item).await?);
    }
    println!("  {} items stocked", stocked.len());

    let mut recorded = 0;
    for n in 0..sales {
        // Stride through the shelf so sales spread over every category
        let item = &stocked[(n * 7) % stocked.len()];
        let quantity = 1 + (n % 3) as i64;

        match db.sales().record(item.id, quantity, item.price_cents).await {
            Ok(_) => recorded += 1,
            Err(DbError::InsufficientStock { .. }) => continue,
            Err(e) => return Err(e.into()),
        }
    }
    if sales > 0 {
        println!("  {recorded} of {sales} sales recorded");
    }

    let low = db.items().list().await?.iter().filter(|i| i.is_low_stock()).count();
    println!("  {low} items below threshold");

    db.close().await;
    Ok(())
}
