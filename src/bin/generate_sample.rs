use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use serde::Serialize;

const ROWS: usize = 1000;

const GENDERS: [&str; 2] = ["Female", "Male"];
const PAYMENT_METHODS: [&str; 4] = ["Credit Card", "Debit Card", "Cash", "PayPal"];

/// Category name with its (mean, spread) price in dollars.
const CATEGORIES: [(&str, f64, f64); 4] = [
    ("Clothing", 45.0, 15.0),
    ("Footwear", 70.0, 20.0),
    ("Accessories", 30.0, 12.0),
    ("Outerwear", 110.0, 30.0),
];

#[derive(Debug, Serialize)]
struct Transaction {
    customer_id: i64,
    gender: &'static str,
    age: i64,
    category: &'static str,
    price: f64,
    payment_method: &'static str,
}

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

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[(self.next_u64() % items.len() as u64) as usize]
    }
}

fn generate(rng: &mut SimpleRng) -> Vec<Transaction> {
    (0..ROWS)
        .map(|i| {
            let &(category, mean, spread) = rng.pick(&CATEGORIES);
            let price = (rng.gauss(mean, spread).max(5.0) * 100.0).round() / 100.0;
            Transaction {
                customer_id: i as i64 + 1,
                gender: *rng.pick(&GENDERS),
                age: rng.gauss(42.0, 14.0).clamp(18.0, 70.0).round() as i64,
                category,
                price,
                payment_method: *rng.pick(&PAYMENT_METHODS),
            }
        })
        .collect()
}

fn write_csv(path: &str, rows: &[Transaction]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).with_context(|| format!("creating {path}"))?;
    for row in rows {
        writer.serialize(row).context("writing CSV row")?;
    }
    writer.flush().context("flushing CSV")?;
    Ok(())
}

fn write_parquet(path: &str, rows: &[Transaction]) -> Result<()> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("customer_id", DataType::Int64, false),
        Field::new("gender", DataType::Utf8, false),
        Field::new("age", DataType::Int64, false),
        Field::new("category", DataType::Utf8, false),
        Field::new("price", DataType::Float64, false),
        Field::new("payment_method", DataType::Utf8, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Int64Array::from_iter_values(rows.iter().map(|r| r.customer_id))),
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.gender))),
            Arc::new(Int64Array::from_iter_values(rows.iter().map(|r| r.age))),
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.category))),
            Arc::new(Float64Array::from_iter_values(rows.iter().map(|r| r.price))),
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.payment_method))),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path).with_context(|| format!("creating {path}"))?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let rows = generate(&mut rng);

    let csv_path = "customer_shopping_behavior.csv";
    let parquet_path = "customer_shopping_behavior.parquet";
    write_csv(csv_path, &rows)?;
    write_parquet(parquet_path, &rows)?;

    println!("Wrote {} transactions to {csv_path} and {parquet_path}", rows.len());
    Ok(())
}
