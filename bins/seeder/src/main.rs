//! Database seeder for Baltfin development and testing.
//!
//! Seeds a month of sample operations and sales so the dashboard has
//! something to show on a fresh database.
//!
//! Usage: cargo run --bin seeder

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{DatabaseConnection, EntityTrait, PaginatorTrait, Set};
use uuid::Uuid;

use baltfin_db::entities::{
    operations, sales,
    sea_orm_active_enums::{Department, Direction, LogisticsStage, OperationType, TransportType},
};
use baltfin_shared::types::Period;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");

    println!("Connecting to database...");
    let db = baltfin_db::connect(&database_url)
        .await
        .expect("Failed to connect to database");

    let period = Period::containing(Utc::now().date_naive());

    println!("Seeding operations for {}...", period.label());
    seed_operations(&db, period).await;

    println!("Seeding sales for {}...", period.label());
    seed_sales(&db, period).await;

    println!("Seeding complete!");
}

#[allow(clippy::too_many_lines)]
async fn seed_operations(db: &DatabaseConnection, period: Period) {
    let existing = operations::Entity::find()
        .count(db)
        .await
        .expect("Failed to count operations");
    if existing > 0 {
        println!("  operations already present, skipping");
        return;
    }

    let now = Utc::now();
    let date = period.start();
    let rows = vec![
        operations::ActiveModel {
            id: Set(Uuid::new_v4()),
            date: Set(date),
            amount: Set(Decimal::from(150_000)),
            counterparty: Set("Клиент А".to_string()),
            purpose: Set("Доставка МСК-КГД".to_string()),
            operation_type: Set(OperationType::Revenue),
            department: Set(Department::LogisticsMsk),
            logistics_stage: Set(None),
            direction: Set(Some(Direction::MskToKgd)),
            created_at: Set(now.into()),
        },
        operations::ActiveModel {
            id: Set(Uuid::new_v4()),
            date: Set(date),
            amount: Set(Decimal::from(80_000)),
            counterparty: Set("Клиент Б".to_string()),
            purpose: Set("Доставка КГД-МСК".to_string()),
            operation_type: Set(OperationType::Revenue),
            department: Set(Department::LogisticsKgd),
            logistics_stage: Set(None),
            direction: Set(Some(Direction::KgdToMsk)),
            created_at: Set(now.into()),
        },
        operations::ActiveModel {
            id: Set(Uuid::new_v4()),
            date: Set(date),
            amount: Set(Decimal::from(-45_000)),
            counterparty: Set("ТК Деловые линии".to_string()),
            purpose: Set("Магистраль".to_string()),
            operation_type: Set(OperationType::Cogs),
            department: Set(Department::LogisticsMsk),
            logistics_stage: Set(Some(LogisticsStage::Mainline)),
            direction: Set(Some(Direction::MskToKgd)),
            created_at: Set(now.into()),
        },
        operations::ActiveModel {
            id: Set(Uuid::new_v4()),
            date: Set(date),
            amount: Set(Decimal::from(-12_000)),
            counterparty: Set("Склад МСК".to_string()),
            purpose: Set("Услуги склада".to_string()),
            operation_type: Set(OperationType::Cogs),
            department: Set(Department::LogisticsMsk),
            logistics_stage: Set(Some(LogisticsStage::DepartureWarehouse)),
            direction: Set(Some(Direction::MskToKgd)),
            created_at: Set(now.into()),
        },
        operations::ActiveModel {
            id: Set(Uuid::new_v4()),
            date: Set(date),
            amount: Set(Decimal::from(-5_000)),
            counterparty: Set("Курьер".to_string()),
            purpose: Set("Забор".to_string()),
            operation_type: Set(OperationType::Cogs),
            department: Set(Department::LogisticsMsk),
            logistics_stage: Set(Some(LogisticsStage::Pickup)),
            direction: Set(Some(Direction::MskToKgd)),
            created_at: Set(now.into()),
        },
        operations::ActiveModel {
            id: Set(Uuid::new_v4()),
            date: Set(date),
            amount: Set(Decimal::from(-30_000)),
            counterparty: Set("Офис".to_string()),
            purpose: Set("Аренда".to_string()),
            operation_type: Set(OperationType::Opex),
            department: Set(Department::Administration),
            logistics_stage: Set(None),
            direction: Set(None),
            created_at: Set(now.into()),
        },
    ];

    operations::Entity::insert_many(rows)
        .exec(db)
        .await
        .expect("Failed to seed operations");
    println!("  6 operations created");
}

async fn seed_sales(db: &DatabaseConnection, period: Period) {
    let existing = sales::Entity::find()
        .count(db)
        .await
        .expect("Failed to count sales");
    if existing > 0 {
        println!("  sales already present, skipping");
        return;
    }

    let now = Utc::now();
    let rows = vec![
        sales::ActiveModel {
            id: Set(Uuid::new_v4()),
            period: Set(period.start()),
            direction: Set(Direction::MskToKgd),
            transport_type: Set(TransportType::Auto),
            client: Set("Клиент А".to_string()),
            weight_kg: Set(Decimal::from(500)),
            volume: Set(None),
            paid_weight_kg: Set(None),
            revenue: Set(Decimal::from(150_000)),
            created_at: Set(now.into()),
        },
        sales::ActiveModel {
            id: Set(Uuid::new_v4()),
            period: Set(period.start()),
            direction: Set(Direction::KgdToMsk),
            transport_type: Set(TransportType::Auto),
            client: Set("Клиент Б".to_string()),
            weight_kg: Set(Decimal::from(200)),
            volume: Set(None),
            paid_weight_kg: Set(None),
            revenue: Set(Decimal::from(80_000)),
            created_at: Set(now.into()),
        },
    ];

    sales::Entity::insert_many(rows)
        .exec(db)
        .await
        .expect("Failed to seed sales");
    println!("  2 sales created");
}
