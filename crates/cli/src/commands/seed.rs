//! Catalog seeding command.
//!
//! Loads the demo product catalog. A second run is a no-op unless `--force`
//! wipes the table first.

use rust_decimal::Decimal;

use copperleaf_core::Category;
use copperleaf_server::db::products::ProductRepository;
use copperleaf_server::models::product::NewProduct;

use super::{CommandError, connect};

/// Seed the catalog.
///
/// # Errors
///
/// Returns `CommandError` if the database is unreachable or an insert fails.
pub async fn run(force: bool) -> Result<(), CommandError> {
    let pool = connect().await?;
    let products = ProductRepository::new(&pool);

    let existing = products.count().await?;
    if existing > 0 {
        if force {
            tracing::warn!(existing, "wiping product catalog before reseed");
            sqlx::query("TRUNCATE products RESTART IDENTITY")
                .execute(&pool)
                .await?;
        } else {
            tracing::info!(existing, "catalog already seeded, skipping (use --force to reseed)");
            return Ok(());
        }
    }

    let catalog = demo_catalog();
    let total = catalog.len();
    for product in &catalog {
        let saved = products.insert(product).await?;
        tracing::debug!(id = %saved.id, title = %saved.title, "seeded product");
    }

    tracing::info!(total, "catalog seeded");
    Ok(())
}

/// The demo catalog.
fn demo_catalog() -> Vec<NewProduct> {
    vec![
        NewProduct {
            title: "Aurora Wireless Headphones".to_owned(),
            description: "Premium wireless headphones with active noise cancellation and 30-hour battery life.".to_owned(),
            price: Decimal::from(129),
            original_price: Some(Decimal::from(179)),
            discount: 28,
            category: Category::Electronics,
            image_url: "https://images.unsplash.com/photo-1505740420928-5e560c06d30e".to_owned(),
            rating: 4.5,
            reviews: 328,
            in_stock: true,
            stock: 45,
            featured: true,
            is_new: false,
            specs: vec![
                "Bluetooth 5.3".to_owned(),
                "Active Noise Cancelling".to_owned(),
                "30hr Battery".to_owned(),
                "USB-C Charging".to_owned(),
            ],
        },
        NewProduct {
            title: "Mechanical Gaming Keyboard".to_owned(),
            description: "RGB mechanical keyboard with Cherry MX switches and customizable backlighting.".to_owned(),
            price: Decimal::from(89),
            original_price: Some(Decimal::from(129)),
            discount: 31,
            category: Category::Electronics,
            image_url: "https://images.unsplash.com/photo-1511467687858-23d96c32e4ae".to_owned(),
            rating: 4.7,
            reviews: 542,
            in_stock: true,
            stock: 32,
            featured: true,
            is_new: false,
            specs: vec![
                "Cherry MX Blue".to_owned(),
                "RGB Lighting".to_owned(),
                "Programmable Keys".to_owned(),
                "USB Passthrough".to_owned(),
            ],
        },
        NewProduct {
            title: "Smart Fitness Watch".to_owned(),
            description: "Advanced fitness tracker with heart rate monitoring, GPS, and 7-day battery life.".to_owned(),
            price: Decimal::from(199),
            original_price: Some(Decimal::from(299)),
            discount: 33,
            category: Category::Electronics,
            image_url: "https://images.unsplash.com/photo-1523275335684-37898b6baf30".to_owned(),
            rating: 4.4,
            reviews: 891,
            in_stock: true,
            stock: 28,
            featured: false,
            is_new: true,
            specs: vec![
                "Heart Rate Monitor".to_owned(),
                "GPS Tracking".to_owned(),
                "Water Resistant".to_owned(),
                "7-day Battery".to_owned(),
            ],
        },
        NewProduct {
            title: "Professional Desk Lamp".to_owned(),
            description: "LED desk lamp with adjustable brightness and color temperature control.".to_owned(),
            price: Decimal::from(45),
            original_price: Some(Decimal::from(65)),
            discount: 31,
            category: Category::Home,
            image_url: "https://images.unsplash.com/photo-1507473885765-e6ed057f782c".to_owned(),
            rating: 4.3,
            reviews: 217,
            in_stock: true,
            stock: 64,
            featured: false,
            is_new: false,
            specs: vec![
                "Adjustable Brightness".to_owned(),
                "Color Temperature Control".to_owned(),
                "Touch Controls".to_owned(),
            ],
        },
        NewProduct {
            title: "Ceramic Pour-Over Coffee Set".to_owned(),
            description: "Hand-glazed ceramic dripper and carafe for slow-brewed coffee at home.".to_owned(),
            price: Decimal::from(38),
            original_price: None,
            discount: 0,
            category: Category::Home,
            image_url: "https://images.unsplash.com/photo-1495474472287-4d71bcdd2085".to_owned(),
            rating: 4.8,
            reviews: 153,
            in_stock: true,
            stock: 41,
            featured: false,
            is_new: true,
            specs: vec!["Hand-glazed Ceramic".to_owned(), "600ml Carafe".to_owned()],
        },
        NewProduct {
            title: "Walnut Standing Desk".to_owned(),
            description: "Height-adjustable standing desk with a solid walnut top and dual motors.".to_owned(),
            price: Decimal::from(549),
            original_price: Some(Decimal::from(699)),
            discount: 21,
            category: Category::Furniture,
            image_url: "https://images.unsplash.com/photo-1518455027359-f3f8164ba6bd".to_owned(),
            rating: 4.6,
            reviews: 98,
            in_stock: true,
            stock: 12,
            featured: true,
            is_new: false,
            specs: vec![
                "Dual Motors".to_owned(),
                "Memory Presets".to_owned(),
                "Solid Walnut Top".to_owned(),
            ],
        },
        NewProduct {
            title: "Ergonomic Mesh Office Chair".to_owned(),
            description: "Breathable mesh chair with lumbar support and fully adjustable armrests.".to_owned(),
            price: Decimal::from(239),
            original_price: None,
            discount: 0,
            category: Category::Furniture,
            image_url: "https://images.unsplash.com/photo-1580480055273-228ff5388ef8".to_owned(),
            rating: 4.2,
            reviews: 305,
            in_stock: true,
            stock: 23,
            featured: false,
            is_new: false,
            specs: vec!["Lumbar Support".to_owned(), "4D Armrests".to_owned()],
        },
        NewProduct {
            title: "Trail Running Shoes".to_owned(),
            description: "Lightweight trail shoes with aggressive grip and a rock plate for technical terrain.".to_owned(),
            price: Decimal::from(119),
            original_price: Some(Decimal::from(149)),
            discount: 20,
            category: Category::Sports,
            image_url: "https://images.unsplash.com/photo-1542291026-7eec264c27ff".to_owned(),
            rating: 4.5,
            reviews: 467,
            in_stock: true,
            stock: 57,
            featured: false,
            is_new: true,
            specs: vec!["Vibram Outsole".to_owned(), "Rock Plate".to_owned()],
        },
        NewProduct {
            title: "Insulated Cycling Bottle".to_owned(),
            description: "Double-wall insulated bottle that keeps drinks cold for 12 hours on the road.".to_owned(),
            price: Decimal::from(24),
            original_price: None,
            discount: 0,
            category: Category::Sports,
            image_url: "https://images.unsplash.com/photo-1602143407151-7111542de6e8".to_owned(),
            rating: 4.1,
            reviews: 88,
            in_stock: true,
            stock: 120,
            featured: false,
            is_new: false,
            specs: vec!["650ml".to_owned(), "Double-wall Insulation".to_owned()],
        },
        NewProduct {
            title: "Merino Wool Overshirt".to_owned(),
            description: "Midweight merino overshirt that works as a shirt or a light jacket.".to_owned(),
            price: Decimal::from(95),
            original_price: Some(Decimal::from(125)),
            discount: 24,
            category: Category::Fashion,
            image_url: "https://images.unsplash.com/photo-1521572163474-6864f9cf17ab".to_owned(),
            rating: 4.6,
            reviews: 142,
            in_stock: true,
            stock: 36,
            featured: true,
            is_new: true,
            specs: vec!["100% Merino".to_owned(), "Machine Washable".to_owned()],
        },
    ]
}
