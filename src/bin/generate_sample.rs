//! Writes a small Northwind-style data directory for the static executor.
//!
//! Usage: `generate_sample [OUT_DIR]` (defaults to `data`).

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{Days, NaiveDate};
use serde_json::{json, Value as JsonValue};

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Uniform integer in `lo..=hi`.
    fn range(&mut self, lo: u64, hi: u64) -> u64 {
        lo + self.next_u64() % (hi - lo + 1)
    }

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[(self.next_u64() % items.len() as u64) as usize]
    }

    /// Money amount with two decimals in `lo..hi`.
    fn money(&mut self, lo: f64, hi: f64) -> f64 {
        ((lo + self.next_f64() * (hi - lo)) * 100.0).round() / 100.0
    }
}

// ---------------------------------------------------------------------------
// Reference data
// ---------------------------------------------------------------------------

const COMPANIES: [(&str, &str, &str, Option<&str>, &str); 12] = [
    ("ALFKI", "Alfreds Futterkiste", "Berlin", None, "Germany"),
    ("ANATR", "Ana Trujillo Emparedados y helados", "México D.F.", None, "Mexico"),
    ("AROUT", "Around the Horn", "London", None, "UK"),
    ("BERGS", "Berglunds snabbköp", "Luleå", None, "Sweden"),
    ("BLONP", "Blondesddsl père et fils", "Strasbourg", None, "France"),
    ("BOTTM", "Bottom-Dollar Markets", "Tsawassen", Some("BC"), "Canada"),
    ("CACTU", "Cactus Comidas para llevar", "Buenos Aires", None, "Argentina"),
    ("FOLKO", "Folk och fä HB", "Bräcke", None, "Sweden"),
    ("GREAL", "Great Lakes Food Market", "Eugene", Some("OR"), "USA"),
    ("HANAR", "Hanari Carnes", "Rio de Janeiro", Some("RJ"), "Brazil"),
    ("LAZYK", "Lazy K Kountry Store", "Walla Walla", Some("WA"), "USA"),
    ("QUICK", "QUICK-Stop", "Cunewalde", None, "Germany"),
];

const CONTACTS: [&str; 8] = [
    "Maria Anders",
    "Ana Trujillo",
    "Thomas Hardy",
    "Christina Berglund",
    "Frédérique Citeaux",
    "Elizabeth Lincoln",
    "Patricio Simpson",
    "Howard Snyder",
];

const CONTACT_TITLES: [&str; 4] = [
    "Sales Representative",
    "Owner",
    "Marketing Manager",
    "Order Administrator",
];

const STREETS: [&str; 6] = [
    "Obere Str. 57",
    "Avda. de la Constitución 2222",
    "120 Hanover Sq.",
    "Berguvsvägen 8",
    "24, place Kléber",
    "2743 Bering St.",
];

const CATEGORIES: [(&str, &str); 8] = [
    ("Beverages", "Soft drinks, coffees, teas, beers, and ales"),
    ("Condiments", "Sweet and savory sauces, relishes, spreads, and seasonings"),
    ("Confections", "Desserts, candies, and sweet breads"),
    ("Dairy Products", "Cheeses"),
    ("Grains/Cereals", "Breads, crackers, pasta, and cereal"),
    ("Meat/Poultry", "Prepared meats"),
    ("Produce", "Dried fruit and bean curd"),
    ("Seafood", "Seaweed and fish"),
];

const PRODUCTS: [&str; 15] = [
    "Chai",
    "Chang",
    "Aniseed Syrup",
    "Chef Anton's Cajun Seasoning",
    "Grandma's Boysenberry Spread",
    "Uncle Bob's Organic Dried Pears",
    "Northwoods Cranberry Sauce",
    "Mishi Kobe Niku",
    "Ikura",
    "Queso Cabrales",
    "Konbu",
    "Tofu",
    "Pavlova",
    "Teatime Chocolate Biscuits",
    "Gustaf's Knäckebröd",
];

const EMPLOYEES: [(&str, &str, &str, &str); 9] = [
    ("Davolio", "Nancy", "Sales Representative", "Ms."),
    ("Fuller", "Andrew", "Vice President, Sales", "Dr."),
    ("Leverling", "Janet", "Sales Representative", "Ms."),
    ("Peacock", "Margaret", "Sales Representative", "Mrs."),
    ("Buchanan", "Steven", "Sales Manager", "Mr."),
    ("Suyama", "Michael", "Sales Representative", "Mr."),
    ("King", "Robert", "Sales Representative", "Mr."),
    ("Callahan", "Laura", "Inside Sales Coordinator", "Ms."),
    ("Dodsworth", "Anne", "Sales Representative", "Ms."),
];

const SUPPLIERS: [(&str, &str, &str); 6] = [
    ("Exotic Liquids", "London", "UK"),
    ("New Orleans Cajun Delights", "New Orleans", "USA"),
    ("Tokyo Traders", "Tokyo", "Japan"),
    ("Pavlova, Ltd.", "Melbourne", "Australia"),
    ("Nord-Ost-Fisch Handelsgesellschaft mbH", "Cuxhaven", "Germany"),
    ("Formaggi Fortini s.r.l.", "Ravenna", "Italy"),
];

const ORDER_COUNT: u64 = 120;

// ---------------------------------------------------------------------------
// Table builders
// ---------------------------------------------------------------------------

fn address(rng: &mut SimpleRng, city: &str, region: Option<&str>, country: &str) -> JsonValue {
    json!({
        "street": rng.pick(&STREETS),
        "city": city,
        "region": region,
        "postalCode": format!("{:05}", rng.range(1000, 99999)),
        "country": country,
        "phone": format!("({:03}) {:03}-{:04}", rng.range(100, 999), rng.range(100, 999), rng.range(0, 9999)),
    })
}

fn customers(rng: &mut SimpleRng) -> Vec<JsonValue> {
    COMPANIES
        .iter()
        .map(|&(id, company, city, region, country)| {
            json!({
                "customerID": id,
                "companyName": company,
                "contactName": rng.pick(&CONTACTS),
                "contactTitle": rng.pick(&CONTACT_TITLES),
                "address": address(rng, city, region, country),
            })
        })
        .collect()
}

fn timestamp(date: NaiveDate) -> String {
    format!("{} 00:00:00.000", date.format("%Y-%m-%d"))
}

fn orders(rng: &mut SimpleRng) -> Result<Vec<JsonValue>> {
    let first = NaiveDate::from_ymd_opt(1996, 7, 4).context("invalid start date")?;
    let mut out = Vec::new();
    for i in 0..ORDER_COUNT {
        let ordered = first
            .checked_add_days(Days::new(i * 2 + rng.range(0, 1)))
            .context("order date out of range")?;
        let required = ordered
            .checked_add_days(Days::new(28))
            .context("required date out of range")?;
        // A few orders are still unshipped.
        let shipped = if rng.next_f64() < 0.1 {
            None
        } else {
            ordered
                .checked_add_days(Days::new(rng.range(1, 20)))
                .map(timestamp)
        };
        let (customer, company, ..) = *rng.pick(&COMPANIES);
        out.push(json!({
            "orderID": 10248 + i,
            "customerID": customer,
            "employeeID": rng.range(1, 9),
            "orderDate": timestamp(ordered),
            "requiredDate": timestamp(required),
            "shippedDate": shipped,
            "shipVia": rng.range(1, 3),
            "freight": rng.money(0.5, 250.0),
            "shipName": company,
        }));
    }
    Ok(out)
}

fn products(rng: &mut SimpleRng) -> Vec<JsonValue> {
    PRODUCTS
        .iter()
        .enumerate()
        .map(|(i, name)| {
            json!({
                "productID": i + 1,
                "name": name,
                "supplierID": rng.range(1, SUPPLIERS.len() as u64),
                "categoryID": rng.range(1, CATEGORIES.len() as u64),
                "quantityPerUnit": format!("{} boxes x {} bags", rng.range(6, 48), rng.range(10, 30)),
                "unitPrice": rng.money(2.5, 98.0),
                "unitsInStock": rng.range(0, 120),
                "unitsOnOrder": *rng.pick(&[0, 0, 10, 40, 70]),
                "reorderLevel": *rng.pick(&[0, 5, 10, 15, 25]),
                "discontinued": rng.next_f64() < 0.2,
            })
        })
        .collect()
}

fn categories() -> Vec<JsonValue> {
    CATEGORIES
        .iter()
        .enumerate()
        .map(|(i, (name, description))| {
            json!({ "categoryID": i + 1, "name": name, "description": description })
        })
        .collect()
}

fn employees(rng: &mut SimpleRng) -> Result<Vec<JsonValue>> {
    let mut out = Vec::new();
    for (i, &(last, first, title, courtesy)) in EMPLOYEES.iter().enumerate() {
        let birth = NaiveDate::from_ymd_opt(1937 + rng.range(0, 30) as i32, 1, 1)
            .and_then(|d| d.checked_add_days(Days::new(rng.range(0, 364))))
            .context("invalid birth date")?;
        let hired = NaiveDate::from_ymd_opt(1992, 4, 1)
            .and_then(|d| d.checked_add_days(Days::new(rng.range(0, 900))))
            .context("invalid hire date")?;
        // Employee 2 is at the top of the hierarchy.
        let reports_to = match i {
            1 => None,
            4 | 0 | 2 | 3 | 7 => Some(2),
            _ => Some(5),
        };
        let (city, region, country) = if i < 5 {
            ("Seattle", Some("WA"), "USA")
        } else {
            ("London", None, "UK")
        };
        out.push(json!({
            "employeeID": i + 1,
            "lastName": last,
            "firstName": first,
            "title": title,
            "titleOfCourtesy": courtesy,
            "birthDate": timestamp(birth),
            "hireDate": timestamp(hired),
            "address": address(rng, city, region, country),
            "reportsTo": reports_to,
        }));
    }
    Ok(out)
}

fn suppliers(rng: &mut SimpleRng) -> Vec<JsonValue> {
    SUPPLIERS
        .iter()
        .enumerate()
        .map(|(i, &(company, city, country))| {
            json!({
                "supplierID": i + 1,
                "companyName": company,
                "contactName": rng.pick(&CONTACTS),
                "contactTitle": rng.pick(&CONTACT_TITLES),
                "address": address(rng, city, None, country),
            })
        })
        .collect()
}

fn write_table(dir: &Path, name: &str, rows: &[JsonValue]) -> Result<()> {
    let path = dir.join(format!("{name}.json"));
    let text = serde_json::to_string_pretty(rows).context("serializing table")?;
    std::fs::write(&path, text).with_context(|| format!("writing {}", path.display()))?;
    println!("Wrote {} rows to {}", rows.len(), path.display());
    Ok(())
}

fn main() -> Result<()> {
    let out_dir = std::env::args()
        .nth(1)
        .map_or_else(|| PathBuf::from("data"), PathBuf::from);
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;

    let mut rng = SimpleRng::new(42);

    write_table(&out_dir, "customers", &customers(&mut rng))?;
    write_table(&out_dir, "orders", &orders(&mut rng)?)?;
    write_table(&out_dir, "products", &products(&mut rng))?;
    write_table(&out_dir, "categories", &categories())?;
    write_table(&out_dir, "employees", &employees(&mut rng)?)?;
    write_table(&out_dir, "suppliers", &suppliers(&mut rng))?;
    Ok(())
}
