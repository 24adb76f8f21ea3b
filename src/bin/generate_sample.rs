use std::sync::Arc;

use arrow::array::{ArrayRef, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use serde::Serialize;

const ATHLETES: [&str; 14] = [
    "Ana", "Beatriz", "Carla", "Daniela", "Eduarda", "Fernanda", "Gabriela", "Helena", "Isabela",
    "Júlia", "Larissa", "Mariana", "Natália", "Olívia",
];

const MOBILITY_METRICS: [&str; 9] = [
    "Deep Squat",
    "Hurdle Step",
    "Inline lunge",
    "Shoulder mobility DA",
    "Shoulder mobility NDA",
    "Leg Raise DA",
    "Leg Raise NDA",
    "TS Push Up",
    "Rotary Stability",
];

/// A jump height or the code written instead of one.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
enum Jump {
    Height(f64),
    Code(&'static str),
}

impl Jump {
    fn text(&self) -> String {
        match self {
            Jump::Height(h) => format!("{h:.1}"),
            Jump::Code(c) => c.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
struct SampleRow {
    #[serde(rename = "")]
    name: &'static str,
    #[serde(rename = "Deep Squat")]
    deep_squat: i64,
    #[serde(rename = "Hurdle Step")]
    hurdle_step: i64,
    #[serde(rename = "Inline lunge")]
    inline_lunge: i64,
    #[serde(rename = "Shoulder mobility DA")]
    shoulder_da: i64,
    #[serde(rename = "Shoulder mobility NDA")]
    shoulder_nda: i64,
    #[serde(rename = "Leg Raise DA")]
    leg_raise_da: i64,
    #[serde(rename = "Leg Raise NDA")]
    leg_raise_nda: i64,
    #[serde(rename = "TS Push Up")]
    ts_push_up: i64,
    #[serde(rename = "Rotary Stability")]
    rotary_stability: i64,
    #[serde(rename = "CM Jump (cm)")]
    cm_jump: Jump,
    #[serde(rename = "Squat Jump (cm)")]
    squat_jump: Jump,
}

impl SampleRow {
    fn scores(&self) -> [i64; 9] {
        [
            self.deep_squat,
            self.hurdle_step,
            self.inline_lunge,
            self.shoulder_da,
            self.shoulder_nda,
            self.leg_raise_da,
            self.leg_raise_nda,
            self.ts_push_up,
            self.rotary_stability,
        ]
    }
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

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }

    /// Mobility score, weighted towards 2.
    fn score(&mut self) -> i64 {
        match self.next_f64() {
            p if p < 0.05 => 0,
            p if p < 0.25 => 1,
            p if p < 0.75 => 2,
            _ => 3,
        }
    }

    /// A jump height, occasionally replaced by an `L` / `NP` code.
    fn jump(&mut self, mean: f64) -> Jump {
        match self.next_f64() {
            p if p < 0.06 => Jump::Code("L"),
            p if p < 0.12 => Jump::Code("NP"),
            _ => Jump::Height((self.gauss(mean, 3.5) * 10.0).round() / 10.0),
        }
    }
}

fn generate(rng: &mut SimpleRng) -> Vec<SampleRow> {
    ATHLETES
        .iter()
        .map(|&name| {
            let cm_jump = rng.jump(29.0);
            // Squat jumps come out a little lower than counter-movement jumps.
            let squat_jump = rng.jump(26.5);
            SampleRow {
                name,
                deep_squat: rng.score(),
                hurdle_step: rng.score(),
                inline_lunge: rng.score(),
                shoulder_da: rng.score(),
                shoulder_nda: rng.score(),
                leg_raise_da: rng.score(),
                leg_raise_nda: rng.score(),
                ts_push_up: rng.score(),
                rotary_stability: rng.score(),
                cm_jump,
                squat_jump,
            }
        })
        .collect()
}

fn write_csv<W: std::io::Write>(out: W, rows: &[SampleRow]) {
    let mut writer = csv::Writer::from_writer(out);
    for row in rows {
        writer.serialize(row).expect("Failed to write CSV row");
    }
    writer.flush().expect("Failed to flush CSV file");
}

/// Same layout as the CSV: blank identifier header, then the tests.
/// Jump columns mix numbers and codes, so they are stored as text.
fn parquet_schema() -> Arc<Schema> {
    let mut fields = vec![Field::new("", DataType::Utf8, false)];
    fields.extend(
        MOBILITY_METRICS
            .iter()
            .map(|m| Field::new(*m, DataType::Int64, false)),
    );
    fields.push(Field::new("CM Jump (cm)", DataType::Utf8, false));
    fields.push(Field::new("Squat Jump (cm)", DataType::Utf8, false));
    Arc::new(Schema::new(fields))
}

fn write_parquet(path: &str, rows: &[SampleRow]) {
    let schema = parquet_schema();

    let mut columns: Vec<ArrayRef> = vec![Arc::new(StringArray::from(
        rows.iter().map(|r| r.name).collect::<Vec<_>>(),
    ))];
    for i in 0..MOBILITY_METRICS.len() {
        columns.push(Arc::new(Int64Array::from(
            rows.iter().map(|r| r.scores()[i]).collect::<Vec<_>>(),
        )));
    }
    columns.push(Arc::new(StringArray::from(
        rows.iter().map(|r| r.cm_jump.text()).collect::<Vec<_>>(),
    )));
    columns.push(Arc::new(StringArray::from(
        rows.iter().map(|r| r.squat_jump.text()).collect::<Vec<_>>(),
    )));

    let batch = RecordBatch::try_new(schema.clone(), columns).expect("Failed to create RecordBatch");

    let file = std::fs::File::create(path).expect("Failed to create output file");
    let mut writer = ArrowWriter::try_new(file, schema, None).expect("Failed to create writer");
    writer.write(&batch).expect("Failed to write batch");
    writer.close().expect("Failed to close writer");
}

fn main() {
    let mut rng = SimpleRng::new(42);
    let rows = generate(&mut rng);

    let valid = rows
        .iter()
        .filter(|r| matches!((&r.cm_jump, &r.squat_jump), (Jump::Height(_), Jump::Height(_))))
        .count();
    let mean_cm: f64 = {
        let heights: Vec<f64> = rows
            .iter()
            .filter_map(|r| match r.cm_jump {
                Jump::Height(h) => Some(h),
                Jump::Code(_) => None,
            })
            .collect();
        heights.iter().sum::<f64>() / heights.len().max(1) as f64
    };

    let csv_file = std::fs::File::create("physical_tests.csv").expect("Failed to create CSV file");
    write_csv(csv_file, &rows);
    write_parquet("physical_tests.parquet", &rows);

    println!(
        "Wrote {} athletes ({valid} with both jumps, mean CM jump {mean_cm:.1} cm) to physical_tests.csv and physical_tests.parquet",
        rows.len()
    );
    println!("Save physical_tests.csv as physical_tests.xlsx from a spreadsheet application to chart it.");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_header_is_blank_in_both_outputs() {
        let rows = generate(&mut SimpleRng::new(42));

        let mut buf = Vec::new();
        write_csv(&mut buf, &rows);
        let csv_text = String::from_utf8(buf).unwrap();
        assert!(csv_text.starts_with(",Deep Squat,"), "{csv_text}");

        let schema = parquet_schema();
        assert_eq!(schema.field(0).name(), "");
        assert_eq!(schema.fields().len(), 12);
    }

    #[test]
    fn test_generation_is_deterministic() {
        let a = generate(&mut SimpleRng::new(42));
        let b = generate(&mut SimpleRng::new(42));
        assert_eq!(a.len(), ATHLETES.len());
        for (x, y) in a.iter().zip(&b) {
            assert_eq!(x.scores(), y.scores());
            assert_eq!(x.cm_jump.text(), y.cm_jump.text());
        }
    }
}
