use std::path::Path;

use stress_detector::schema::csv_header;

/// `(sleep, screen, exercise, meals, water, label)` rows with a clear
/// sleep/screen trend per level.
pub fn sample_rows() -> Vec<(f32, f32, u8, u32, f32, i64)> {
    let mut rows = Vec::new();
    for level in 1..=5i64 {
        for jitter in 0..6 {
            let j = jitter as f32 * 0.1;
            let sleep = 9.0 - level as f32 + j;
            let screen = 1.5 * level as f32 + j;
            let exercise = u8::from(level <= 2 || jitter % 2 == 0);
            let meals = if level >= 4 { 2 } else { 3 };
            let water = 3.2 - 0.5 * level as f32 + j / 2.0;
            rows.push((sleep, screen, exercise, meals, water, level));
        }
    }
    rows
}

/// Writes the header followed by `rows` and any raw `extra` lines.
pub fn write_csv(path: &Path, rows: &[(f32, f32, u8, u32, f32, i64)], extra: &[&str]) {
    let mut text = csv_header();
    text.push('\n');
    for (sleep, screen, exercise, meals, water, label) in rows {
        text.push_str(&format!(
            "{sleep},{screen},{exercise},{meals},{water},{label}\n"
        ));
    }
    for line in extra {
        text.push_str(line);
        text.push('\n');
    }
    std::fs::write(path, text).expect("write csv fixture");
}
