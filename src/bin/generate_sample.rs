use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
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

    /// Log-normal abundance around `median`; measurements are never negative.
    fn abundance(&mut self, median: f64, spread: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        median * (spread * z).exp()
    }
}

const STRAINS: [&str; 4] = ["A.J", "C57BL.6J", "BALB.cJ", "DBA.2J"];
const MICE_PER_STRAIN: usize = 6;

/// Protein table: a `Strains` identifier then one column per protein.
fn write_proteins(rng: &mut SimpleRng, path: &str) -> Result<usize> {
    let proteins: Vec<String> = (0..60).map(|i| format!("P{:05}", 10_000 + i * 37)).collect();

    let mut writer = csv::Writer::from_path(path).context("creating protein CSV")?;
    let mut header = vec!["Strains".to_string()];
    header.extend(proteins.iter().cloned());
    writer.write_record(&header)?;

    let mut rows = 0;
    for (s, strain) in STRAINS.iter().enumerate() {
        for mouse in 1..=MICE_PER_STRAIN {
            let mut record = vec![format!("{strain}_{mouse}")];
            for p in 0..proteins.len() {
                // Roughly one cell in forty is missing.
                if rng.next_f64() < 0.025 {
                    record.push(String::new());
                } else {
                    let median = 50.0 + ((p * 13 + s * 29) % 97) as f64;
                    record.push(format!("{:.4}", rng.abundance(median, 0.2)));
                }
            }
            writer.write_record(&record)?;
            rows += 1;
        }
    }
    writer.flush()?;
    Ok(rows)
}

/// Lipid table: six metadata columns, then species named `CLASS(chain)`.
fn write_lipids(rng: &mut SimpleRng, path: &str) -> Result<usize> {
    let classes: [(&str, f64, usize); 7] = [
        ("CE", 40.0, 6),
        ("PC", 120.0, 10),
        ("PE", 60.0, 8),
        ("SM", 30.0, 4),
        ("TG", 80.0, 12),
        ("LPC", 10.0, 5),
        ("Cer", 5.0, 4),
    ];
    let species: Vec<(String, f64)> = classes
        .iter()
        .flat_map(|&(class, median, n)| {
            (0..n).map(move |i| {
                let chain = format!("{}:{}", 14 + 2 * i, i % 4);
                (format!("{class}({chain})"), median / (1.0 + i as f64))
            })
        })
        .collect();

    let n_rows = STRAINS.len() * MICE_PER_STRAIN;
    let mut strain_col = Vec::with_capacity(n_rows);
    let mut sex_col = Vec::with_capacity(n_rows);
    let mut age_col = Vec::with_capacity(n_rows);
    let mut weight_col = Vec::with_capacity(n_rows);
    let mut batch_col = Vec::with_capacity(n_rows);
    let mut id_col = Vec::with_capacity(n_rows);

    for (s, strain) in STRAINS.iter().enumerate() {
        for mouse in 1..=MICE_PER_STRAIN {
            strain_col.push(format!("{strain}_{mouse}"));
            sex_col.push(if mouse % 2 == 0 { "F" } else { "M" });
            age_col.push(8 + (mouse as i64 % 3) * 4);
            weight_col.push(20.0 + rng.next_f64() * 8.0);
            batch_col.push(format!("B{}", 1 + (s + mouse) % 2));
            id_col.push((s * MICE_PER_STRAIN + mouse) as i64);
        }
    }

    let mut fields = vec![
        Field::new("Strains", DataType::Utf8, false),
        Field::new("Sex", DataType::Utf8, false),
        Field::new("AgeWeeks", DataType::Int64, false),
        Field::new("WeightG", DataType::Float64, false),
        Field::new("Batch", DataType::Utf8, false),
        Field::new("MouseId", DataType::Int64, false),
    ];
    let mut arrays: Vec<ArrayRef> = vec![
        Arc::new(StringArray::from(strain_col)),
        Arc::new(StringArray::from(sex_col)),
        Arc::new(Int64Array::from(age_col)),
        Arc::new(Float64Array::from(weight_col)),
        Arc::new(StringArray::from(batch_col)),
        Arc::new(Int64Array::from(id_col)),
    ];

    for (name, median) in &species {
        let values: Vec<Option<f64>> = (0..n_rows)
            .map(|_| (rng.next_f64() >= 0.03).then(|| rng.abundance(*median, 0.3)))
            .collect();
        fields.push(Field::new(name, DataType::Float64, true));
        arrays.push(Arc::new(Float64Array::from(values)));
    }

    let schema = Arc::new(Schema::new(fields));
    let batch = RecordBatch::try_new(schema.clone(), arrays).context("building record batch")?;

    let file = std::fs::File::create(path).context("creating lipid parquet file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None)?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(species.len())
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);

    let protein_path = "sample_proteins.csv";
    let rows = write_proteins(&mut rng, protein_path)?;
    println!("Wrote {rows} mice to {protein_path}");

    let lipid_path = "sample_lipids.parquet";
    let n_species = write_lipids(&mut rng, lipid_path)?;
    println!("Wrote {n_species} lipid species to {lipid_path} (measurements start at column 6)");
    Ok(())
}
