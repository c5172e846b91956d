//! Seed the database with sample catalog data.
//!
//! Inserts a couple of suppliers and a small product catalog so a fresh
//! environment has something to browse and order against. Safe to run more
//! than once: rows are matched by name and skipped when present.

use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::info;

use akubata_api::db;
use akubata_core::{ProductId, SupplierId};

struct SeedSupplier {
    company_name: &'static str,
    contact_email: &'static str,
    country: &'static str,
}

struct SeedProduct {
    product_name: &'static str,
    category: &'static str,
    unit_price: &'static str,
    stock_quantity: i32,
    supplier: &'static str,
}

const SUPPLIERS: &[SeedSupplier] = &[
    SeedSupplier {
        company_name: "Marina Textiles",
        contact_email: "orders@marinatextiles.example",
        country: "Nigeria",
    },
    SeedSupplier {
        company_name: "Harbor Goods Co",
        contact_email: "sales@harborgoods.example",
        country: "Ghana",
    },
];

const PRODUCTS: &[SeedProduct] = &[
    SeedProduct {
        product_name: "Canvas Tote Bag",
        category: "Bags",
        unit_price: "24.99",
        stock_quantity: 120,
        supplier: "Marina Textiles",
    },
    SeedProduct {
        product_name: "Linen Throw Blanket",
        category: "Home",
        unit_price: "59.00",
        stock_quantity: 40,
        supplier: "Marina Textiles",
    },
    SeedProduct {
        product_name: "Ceramic Mug Set",
        category: "Kitchen",
        unit_price: "32.50",
        stock_quantity: 75,
        supplier: "Harbor Goods Co",
    },
    SeedProduct {
        product_name: "Bamboo Cutting Board",
        category: "Kitchen",
        unit_price: "18.00",
        stock_quantity: 200,
        supplier: "Harbor Goods Co",
    },
];

/// Seed sample suppliers and products.
///
/// # Errors
///
/// Returns an error if the connection or any insert fails.
pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let database_url = super::database_url()?;

    let pool = db::create_pool(&database_url).await?;
    info!("Connected to database");

    let mut inserted = 0usize;
    let mut skipped = 0usize;

    for supplier in SUPPLIERS {
        if seed_supplier(&pool, supplier).await? {
            inserted += 1;
        } else {
            skipped += 1;
        }
    }

    for product in PRODUCTS {
        if seed_product(&pool, product).await? {
            inserted += 1;
        } else {
            skipped += 1;
        }
    }

    info!("Seeding complete!");
    info!("  Rows inserted: {inserted}");
    info!("  Rows skipped (already exist): {skipped}");

    Ok(())
}

async fn seed_supplier(pool: &PgPool, supplier: &SeedSupplier) -> Result<bool, sqlx::Error> {
    let existing: Option<(SupplierId,)> =
        sqlx::query_as("SELECT id FROM suppliers WHERE company_name = $1")
            .bind(supplier.company_name)
            .fetch_optional(pool)
            .await?;

    if existing.is_some() {
        return Ok(false);
    }

    sqlx::query(
        "INSERT INTO suppliers (company_name, contact_email, country) VALUES ($1, $2, $3)",
    )
    .bind(supplier.company_name)
    .bind(supplier.contact_email)
    .bind(supplier.country)
    .execute(pool)
    .await?;

    info!(supplier = supplier.company_name, "Supplier seeded");
    Ok(true)
}

async fn seed_product(pool: &PgPool, product: &SeedProduct) -> Result<bool, sqlx::Error> {
    let existing: Option<(ProductId,)> =
        sqlx::query_as("SELECT id FROM products WHERE product_name = $1")
            .bind(product.product_name)
            .fetch_optional(pool)
            .await?;

    if existing.is_some() {
        return Ok(false);
    }

    let unit_price: Decimal = product
        .unit_price
        .parse()
        .map_err(|_| sqlx::Error::Protocol("invalid seed price".into()))?;

    sqlx::query(
        "INSERT INTO products (product_name, category, unit_price, stock_quantity, supplier_id) \
         SELECT $1, $2, $3, $4, s.id FROM suppliers s WHERE s.company_name = $5",
    )
    .bind(product.product_name)
    .bind(product.category)
    .bind(unit_price)
    .bind(product.stock_quantity)
    .bind(product.supplier)
    .execute(pool)
    .await?;

    info!(product = product.product_name, "Product seeded");
    Ok(true)
}
