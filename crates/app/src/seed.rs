//! Built-in catalog seed data.

use common::ProductId;
use domain::{Money, Product};

fn product(
    id: &str,
    name: &str,
    description: &str,
    price_cents: i64,
    image_url: &str,
    stock: u32,
) -> Product {
    Product {
        id: ProductId::new(id),
        name: name.to_string(),
        description: description.to_string(),
        price: Money::from_cents(price_cents),
        image_url: image_url.to_string(),
        stock,
        category: None,
        tags: None,
    }
}

/// The ten-product starter catalog written by `grocer seed`.
pub fn seed_products() -> Vec<Product> {
    vec![
        product(
            "prod_001",
            "Wireless Headphones",
            "Premium noise-canceling wireless headphones with 30-hour battery life. Perfect for music lovers and professionals.",
            2499,
            "https://images.unsplash.com/photo-1505740420928-5e560c06d30e?w=500",
            25,
        ),
        product(
            "prod_002",
            "Smart Watch Pro",
            "Advanced fitness tracking smartwatch with heart rate monitor, GPS, and water resistance up to 50m.",
            4999,
            "https://images.unsplash.com/photo-1523275335684-37898b6baf30?w=500",
            15,
        ),
        product(
            "prod_003",
            "Laptop Stand",
            "Ergonomic aluminum laptop stand with adjustable height. Improves posture and reduces neck strain.",
            1299,
            "https://images.unsplash.com/photo-1527864550417-7fd91fc51a46?w=500",
            50,
        ),
        product(
            "prod_004",
            "Mechanical Keyboard",
            "RGB backlit mechanical gaming keyboard with blue switches. Perfect for gaming and typing enthusiasts.",
            3499,
            "https://images.unsplash.com/photo-1587829741301-dc798b83add3?w=500",
            30,
        ),
        product(
            "prod_005",
            "Wireless Mouse",
            "Ergonomic wireless mouse with precision tracking and rechargeable battery lasting up to 3 months.",
            899,
            "https://images.unsplash.com/photo-1527814050087-3793815479db?w=500",
            40,
        ),
        product(
            "prod_006",
            "USB-C Hub",
            "7-in-1 USB-C hub with HDMI, USB 3.0 ports, SD card reader, and 100W power delivery.",
            1999,
            "https://images.unsplash.com/photo-1625948515291-69613efd103f?w=500",
            35,
        ),
        product(
            "prod_007",
            "Phone Case Premium",
            "Military-grade drop protection phone case with raised edges for screen and camera protection.",
            599,
            "https://images.unsplash.com/photo-1601784551446-20c9e07cdbdb?w=500",
            100,
        ),
        product(
            "prod_008",
            "Portable Charger 20000mAh",
            "High-capacity power bank with fast charging support and dual USB ports. Charge multiple devices.",
            1799,
            "https://images.unsplash.com/photo-1609091839311-d5365f9ff1c5?w=500",
            45,
        ),
        product(
            "prod_009",
            "Bluetooth Speaker",
            "Waterproof portable Bluetooth speaker with 360° sound and 12-hour playtime. Perfect for outdoors.",
            2999,
            "https://images.unsplash.com/photo-1608043152269-423dbba4e7e1?w=500",
            20,
        ),
        product(
            "prod_010",
            "Webcam HD 1080p",
            "Full HD webcam with auto-focus and built-in microphone. Ideal for video calls and streaming.",
            3299,
            "https://images.unsplash.com/photo-1587825140708-dfaf72ae4b04?w=500",
            18,
        ),
    ]
}
