use uuid::Uuid;

use crate::vacation::Vacation;

/// The packages loaded into an empty catalog at startup.
pub fn seed_vacations() -> Vec<Vacation> {
    vec![
        Vacation {
            id: Uuid::new_v4(),
            name: "Hood River Day Trip".to_string(),
            slug: "hood-river-day-trip".to_string(),
            category: "Day Trip".to_string(),
            sku: "HR199".to_string(),
            description: "Spend a day sailing on the Columbia and enjoying craft beers in Hood River!".to_string(),
            price_in_cents: 9995,
            tags: tags(&["day trip", "hood river", "sailing", "windsurfing", "breweries"]),
            in_season: true,
            available: true,
            requires_waiver: false,
            maximum_guests: 16,
            notes: None,
            packages_sold: 0,
        },
        Vacation {
            id: Uuid::new_v4(),
            name: "Oregon Coast Getaway".to_string(),
            slug: "oregon-coast-getaway".to_string(),
            category: "Weekend Getaway".to_string(),
            sku: "OC39".to_string(),
            description: "Enjoy the ocean air and quaint coastal towns!".to_string(),
            price_in_cents: 269995,
            tags: tags(&["weekend getaway", "oregon coast", "beachcombing"]),
            in_season: false,
            available: true,
            requires_waiver: false,
            maximum_guests: 8,
            notes: None,
            packages_sold: 0,
        },
        Vacation {
            id: Uuid::new_v4(),
            name: "Rock Climbing in Bend".to_string(),
            slug: "rock-climbing-in-bend".to_string(),
            category: "Adventure".to_string(),
            sku: "B99".to_string(),
            description: "Experience the thrill of climbing in the high desert.".to_string(),
            price_in_cents: 289995,
            tags: tags(&["weekend getaway", "bend", "high desert", "rock climbing"]),
            in_season: true,
            available: false,
            requires_waiver: true,
            maximum_guests: 4,
            notes: Some("The tour guide is currently recovering from a skiing accident.".to_string()),
            packages_sold: 0,
        },
    ]
}

fn tags(values: &[&str]) -> Vec<String> {
    values.iter().map(|t| t.to_string()).collect()
}
