use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use clap::Parser;
use parquet::arrow::ArrowWriter;

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
        let result = (self.state[1].wrapping_mul(5)).rotate_left(7).wrapping_mul(9);
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

    fn below(&mut self, n: usize) -> usize {
        (self.next_f64() * n as f64) as usize % n
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

/// One synthetic sales report.
struct Transaction {
    report_id: String,
    sales_person_id: String,
    product_id: String,
    quantity: i64,
    total_sales_value: f64,
    suspicious: &'static str,
}

/// Unit prices of the synthetic product catalogue.
const PRODUCTS: [(&str, f64); 5] = [
    ("PR6112", 12.5),
    ("PR6253", 48.0),
    ("PR6294", 7.25),
    ("PR6457", 110.0),
    ("PR6597", 23.0),
];

fn generate(rng: &mut SimpleRng, n: usize, first_id: usize) -> Vec<Transaction> {
    (0..n)
        .map(|i| {
            let (product_id, unit_price) = PRODUCTS[rng.below(PRODUCTS.len())];
            let quantity = rng.gauss(4.0, 1.2).exp().round().max(1.0) as i64;

            // Most reports are priced close to list; a few are far off.
            let markup = if rng.next_f64() < 0.1 {
                rng.gauss(3.0, 0.8).max(1.5)
            } else {
                rng.gauss(1.0, 0.05)
            };
            let total = (quantity as f64 * unit_price * markup * 100.0).round() / 100.0;

            let suspicious = if markup > 1.5 {
                "Yes"
            } else if markup > 1.08 {
                "indeterminate"
            } else {
                "No"
            };

            Transaction {
                report_id: format!("Rep{}", 10000 + first_id + i),
                sales_person_id: format!("C{}", 21000 + rng.below(40)),
                product_id: product_id.to_string(),
                quantity,
                total_sales_value: total,
                suspicious,
            }
        })
        .collect()
}

fn write_csv(path: &Path, rows: &[Transaction], with_label: bool) -> Result<()> {
    let mut writer =
        csv::Writer::from_path(path).with_context(|| format!("creating {}", path.display()))?;
    let mut header = vec![
        "ReportID",
        "SalesPersonID",
        "ProductID",
        "Quantity",
        "TotalSalesValues",
    ];
    if with_label {
        header.push("Suspicious");
    }
    writer.write_record(&header)?;

    for t in rows {
        let mut record = vec![
            t.report_id.clone(),
            t.sales_person_id.clone(),
            t.product_id.clone(),
            t.quantity.to_string(),
            t.total_sales_value.to_string(),
        ];
        if with_label {
            record.push(t.suspicious.to_string());
        }
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(())
}

fn write_parquet(path: &Path, rows: &[Transaction]) -> Result<()> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("ReportID", DataType::Utf8, false),
        Field::new("SalesPersonID", DataType::Utf8, false),
        Field::new("ProductID", DataType::Utf8, false),
        Field::new("Quantity", DataType::Int64, false),
        Field::new("TotalSalesValues", DataType::Float64, false),
        Field::new("Suspicious", DataType::Utf8, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(StringArray::from_iter_values(rows.iter().map(|t| &t.report_id))),
            Arc::new(StringArray::from_iter_values(rows.iter().map(|t| &t.sales_person_id))),
            Arc::new(StringArray::from_iter_values(rows.iter().map(|t| &t.product_id))),
            Arc::new(Int64Array::from_iter_values(rows.iter().map(|t| t.quantity))),
            Arc::new(Float64Array::from_iter_values(
                rows.iter().map(|t| t.total_sales_value),
            )),
            Arc::new(StringArray::from_iter_values(rows.iter().map(|t| t.suspicious))),
        ],
    )
    .context("building record batch")?;

    let file =
        std::fs::File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut writer = ArrowWriter::try_new(file, schema, None)?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(())
}

/// Write a deterministic synthetic sales-transactions dataset.
#[derive(Parser)]
#[command(name = "generate_sample")]
struct Args {
    /// Directory that receives Train.csv, Train.parquet and Test.csv.
    #[arg(default_value = "datasets")]
    out_dir: PathBuf,

    /// Number of training rows.
    #[arg(long, default_value_t = 1000)]
    train_rows: usize,

    /// Number of test rows.
    #[arg(long, default_value_t = 250)]
    test_rows: usize,

    #[arg(long, default_value_t = 42)]
    seed: u64,
}

fn main() -> Result<()> {
    let args = Args::parse();
    let mut rng = SimpleRng::new(args.seed);

    let train = generate(&mut rng, args.train_rows, 0);
    let test = generate(&mut rng, args.test_rows, args.train_rows);

    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("creating {}", args.out_dir.display()))?;
    write_csv(&args.out_dir.join("Train.csv"), &train, true)?;
    write_parquet(&args.out_dir.join("Train.parquet"), &train)?;
    write_csv(&args.out_dir.join("Test.csv"), &test, false)?;

    println!(
        "Wrote {} training and {} test transactions to {}",
        train.len(),
        test.len(),
        args.out_dir.display()
    );
    Ok(())
}
