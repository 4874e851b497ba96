use chrono::NaiveDate;

use crate::models::actor::{Actor, Role};
use crate::models::order::{Address, Customer, OrderDraft, Package};

pub fn draft(customer_name: &str) -> OrderDraft {
    OrderDraft {
        customer: Customer {
            name: customer_name.to_string(),
            phone: "+1-555-0100".to_string(),
            email: None,
        },
        delivery_address: Address {
            line1: "12 Harbor Way".to_string(),
            line2: None,
            city: "Hamburg".to_string(),
            state: "HH".to_string(),
            zip: "20457".to_string(),
            country: "DE".to_string(),
            location: None,
        },
        pickup_date: NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
        packages: vec![Package {
            description: "parcel".to_string(),
            quantity: 1,
            weight_kg: Some(2.5),
            dimensions: None,
        }],
        special_instructions: None,
        created_by: Actor {
            name: "ops".to_string(),
            role: Role::Admin,
        },
    }
}
