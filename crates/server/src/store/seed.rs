//! Demo dataset loaded at startup.
//!
//! Two accounts are available out of the box:
//! - `admin@fruitporter.com` / `admin123` (administrator, 999999 credit)
//! - `demo@fruitporter.com` / `demo123` (customer, 10000 credit)

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHasher};
use chrono::Utc;
use fruit_porter_core::{AccountStatus, CategoryId, Email};
use rust_decimal::Decimal;

use crate::models::{Category, Product, Setting, User};
use crate::store::Database;

pub const ADMIN_EMAIL: &str = "admin@fruitporter.com";
pub const DEMO_EMAIL: &str = "demo@fruitporter.com";

fn hash(password: &str) -> String {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_or_else(
            |_| unreachable!("argon2 default params accept any password"),
            |hashed| hashed.to_string(),
        )
}

fn email(raw: &str) -> Email {
    Email::parse(raw).map_or_else(
        |_| unreachable!("seed emails are well-formed"),
        |parsed| parsed,
    )
}

fn money(cents: i64) -> Decimal {
    Decimal::new(cents, 2)
}

/// Fills an empty database with the demo catalog, accounts and settings.
pub fn populate(db: &mut Database) {
    let now = Utc::now();

    let category = |db: &mut Database, name: &str, icon: &str, sort_order: i32| {
        let id = db.issue_category_id();
        db.categories.push(Category {
            id,
            name: name.to_owned(),
            icon: Some(icon.to_owned()),
            sort_order,
            created_at: now,
        });
        id
    };

    let seasonal = category(db, "Seasonal Picks", "🍂", 1);
    let citrus = category(db, "Citrus", "🍊", 2);
    let berries = category(db, "Berries", "🫐", 3);
    let tropical = category(db, "Tropical", "🍍", 4);
    let stone_fruit = category(db, "Stone Fruit", "🍑", 5);
    let gift_boxes = category(db, "Gift Boxes", "🎁", 6);

    struct SeedProduct {
        category: CategoryId,
        name: &'static str,
        description: &'static str,
        price_cents: i64,
        original_price_cents: Option<i64>,
        image: &'static str,
        stock: i32,
        featured: bool,
        seasonal: bool,
    }

    let catalog = [
        SeedProduct {
            category: seasonal,
            name: "Honeycrisp Apples",
            description: "Crisp, sweet and freshly picked, sold by the kilo",
            price_cents: 4500,
            original_price_cents: Some(5200),
            image: "/images/honeycrisp-apples.jpg",
            stock: 120,
            featured: true,
            seasonal: true,
        },
        SeedProduct {
            category: citrus,
            name: "Navel Oranges",
            description: "Seedless and easy to peel, a lunchbox staple",
            price_cents: 3800,
            original_price_cents: None,
            image: "/images/navel-oranges.jpg",
            stock: 200,
            featured: true,
            seasonal: false,
        },
        SeedProduct {
            category: citrus,
            name: "Meyer Lemons",
            description: "Thin-skinned and fragrant, perfect for baking",
            price_cents: 2600,
            original_price_cents: None,
            image: "/images/meyer-lemons.jpg",
            stock: 150,
            featured: false,
            seasonal: false,
        },
        SeedProduct {
            category: berries,
            name: "Strawberries",
            description: "Picked at peak ripeness, one punnet per order unit",
            price_cents: 5900,
            original_price_cents: Some(6800),
            image: "/images/strawberries.jpg",
            stock: 80,
            featured: true,
            seasonal: true,
        },
        SeedProduct {
            category: berries,
            name: "Blueberries",
            description: "Plump highbush berries, great for breakfast",
            price_cents: 4900,
            original_price_cents: None,
            image: "/images/blueberries.jpg",
            stock: 90,
            featured: false,
            seasonal: true,
        },
        SeedProduct {
            category: tropical,
            name: "Mangoes",
            description: "Honey-sweet and fiberless, tray of four",
            price_cents: 6500,
            original_price_cents: None,
            image: "/images/mangoes.jpg",
            stock: 70,
            featured: true,
            seasonal: false,
        },
        SeedProduct {
            category: tropical,
            name: "Pineapple",
            description: "Whole golden pineapple, ready to cut",
            price_cents: 3200,
            original_price_cents: None,
            image: "/images/pineapple.jpg",
            stock: 60,
            featured: false,
            seasonal: false,
        },
        SeedProduct {
            category: tropical,
            name: "Bananas",
            description: "Fair-trade bunches, ripened to order",
            price_cents: 1800,
            original_price_cents: None,
            image: "/images/bananas.jpg",
            stock: 300,
            featured: false,
            seasonal: false,
        },
        SeedProduct {
            category: stone_fruit,
            name: "Peaches",
            description: "Freestone peaches with a floral finish",
            price_cents: 4200,
            original_price_cents: None,
            image: "/images/peaches.jpg",
            stock: 100,
            featured: false,
            seasonal: true,
        },
        SeedProduct {
            category: stone_fruit,
            name: "Cherries",
            description: "Dark sweet cherries, half-kilo bag",
            price_cents: 8800,
            original_price_cents: Some(9900),
            image: "/images/cherries.jpg",
            stock: 50,
            featured: true,
            seasonal: true,
        },
        SeedProduct {
            category: gift_boxes,
            name: "Classic Fruit Crate",
            description: "Eight varieties in a wooden crate with a card",
            price_cents: 19900,
            original_price_cents: Some(23900),
            image: "/images/classic-crate.jpg",
            stock: 40,
            featured: true,
            seasonal: false,
        },
        SeedProduct {
            category: gift_boxes,
            name: "Deluxe Fruit Crate",
            description: "Twelve premium varieties, our biggest crate",
            price_cents: 39900,
            original_price_cents: None,
            image: "/images/deluxe-crate.jpg",
            stock: 25,
            featured: false,
            seasonal: false,
        },
    ];

    for item in catalog {
        let id = db.issue_product_id();
        db.products.push(Product {
            id,
            category_id: Some(item.category),
            name: item.name.to_owned(),
            description: Some(item.description.to_owned()),
            price: money(item.price_cents),
            original_price: item.original_price_cents.map(money),
            image_url: Some(item.image.to_owned()),
            stock: item.stock,
            is_featured: item.featured,
            is_seasonal: item.seasonal,
            created_at: now,
        });
    }

    let admin_id = db.issue_user_id();
    db.users.push(User {
        id: admin_id,
        email: email(ADMIN_EMAIL),
        password_hash: hash("admin123"),
        name: "Admin".to_owned(),
        phone: None,
        address: None,
        is_admin: true,
        credit: Decimal::from(999_999),
        status: AccountStatus::Active,
        created_at: now,
    });
    let demo_id = db.issue_user_id();
    db.users.push(User {
        id: demo_id,
        email: email(DEMO_EMAIL),
        password_hash: hash("demo123"),
        name: "Demo User".to_owned(),
        phone: Some("555-0100".to_owned()),
        address: Some("12 Orchard Lane".to_owned()),
        is_admin: false,
        credit: Decimal::from(10_000),
        status: AccountStatus::Active,
        created_at: now,
    });

    for (key, value) in [
        ("current_theme", "default"),
        ("marquee_text", "Free shipping on orders over $799!"),
    ] {
        let id = db.issue_setting_id();
        db.settings.push(Setting {
            id,
            key: key.to_owned(),
            value: value.to_owned(),
            updated_at: now,
        });
    }
}
