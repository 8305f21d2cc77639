//! Generate glyph-encoded sample exports for manual testing.
//!
//! Writes `sample_uv.txt` and `sample_vis.odt` into the current directory.
//! Both hold two whitespace-separated columns (wavelength, percent
//! transmission) with every digit and period replaced by the instrument's
//! default glyph set.

use std::io::Write;

use zip::write::SimpleFileOptions;

/// Default glyph substitutions, matching the application's compiled-in map.
const GLYPH_PAIRS: [(char, char); 11] = [
    ('0', '°'),
    ('1', '1'),
    ('2', '2'),
    ('3', '³'),
    ('4', '4'),
    ('5', 'µ'),
    ('6', '¶'),
    ('7', '7'),
    ('8', '8'),
    ('9', '¹'),
    ('.', '®'),
];

fn encode(text: &str) -> String {
    text.chars()
        .map(|c| {
            GLYPH_PAIRS
                .iter()
                .find(|&&(source, _)| source == c)
                .map(|&(_, glyph)| glyph)
                .unwrap_or(c)
        })
        .collect()
}

fn gaussian(x: f64, mu: f64, sigma: f64, amplitude: f64) -> f64 {
    amplitude * (-(x - mu).powi(2) / (2.0 * sigma.powi(2))).exp()
}

/// Minimal deterministic PRNG (splitmix64)
struct SimpleRng {
    state: u64,
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        SimpleRng { state: seed }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(0x9E3779B97F4A7C15);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
        z ^ (z >> 31)
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }
}

/// Synthetic transmission curve: a high baseline with absorption dips.
fn transmission_rows(
    range: std::ops::RangeInclusive<i64>,
    step: i64,
    dips: &[(f64, f64, f64)],
    rng: &mut SimpleRng,
) -> Vec<(f64, f64)> {
    let mut rows = Vec::new();
    let mut wl = *range.start();
    while wl <= *range.end() {
        let x = wl as f64;
        let absorbed: f64 = dips
            .iter()
            .map(|&(mu, sigma, amp)| gaussian(x, mu, sigma, amp))
            .sum();
        let noise = (rng.next_f64() - 0.5) * 0.4;
        let y = (92.0 - absorbed + noise).clamp(0.0, 100.0);
        rows.push((x, y));
        wl += step;
    }
    rows
}

fn encoded_lines(rows: &[(f64, f64)]) -> Vec<String> {
    rows.iter()
        .map(|&(x, y)| encode(&format!("{x:.1} {y:.2}")))
        .collect()
}

fn write_txt(path: &str, lines: &[String]) -> std::io::Result<()> {
    let mut file = std::fs::File::create(path)?;
    for line in lines {
        writeln!(file, "{line}")?;
    }
    Ok(())
}

fn write_odt(path: &str, lines: &[String]) -> anyhow::Result<()> {
    let file = std::fs::File::create(path)?;
    let mut writer = zip::ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);

    writer.start_file("mimetype", options)?;
    writer.write_all(b"application/vnd.oasis.opendocument.text")?;

    writer.start_file("content.xml", options)?;
    write!(
        writer,
        r#"<?xml version="1.0" encoding="UTF-8"?><office:document-content><office:body><office:text>"#
    )?;
    for line in lines {
        write!(writer, "<text:p>{line}</text:p>")?;
    }
    write!(writer, "</office:text></office:body></office:document-content>")?;
    writer.finish()?;
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let mut rng = SimpleRng::new(42);

    // UV range scan, strong dip around 260 nm (nucleic-acid-like)
    let uv = transmission_rows(
        190..=400,
        1,
        &[(260.0, 18.0, 70.0), (215.0, 10.0, 35.0)],
        &mut rng,
    );
    let uv_lines = encoded_lines(&uv);
    write_txt("sample_uv.txt", &uv_lines)?;

    // Visible range scan, broad dye-like absorption bands
    let vis = transmission_rows(
        380..=780,
        2,
        &[(520.0, 40.0, 55.0), (660.0, 25.0, 30.0)],
        &mut rng,
    );
    let vis_lines = encoded_lines(&vis);
    write_odt("sample_vis.odt", &vis_lines)?;

    println!(
        "Wrote sample_uv.txt ({} rows) and sample_vis.odt ({} rows)",
        uv_lines.len(),
        vis_lines.len()
    );
    Ok(())
}
