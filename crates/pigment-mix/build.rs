use std::env;
use std::fs::File;
use std::io::Write;
use std::path::Path;

const FIRST_WAVELENGTH_NM: f64 = 380.0;
const STEP_NM: f64 = 10.0;
const SAMPLE_COUNT: usize = 36;

/// Blue band falls off around this wavelength.
const BLUE_EDGE_NM: f64 = 495.0;
const BLUE_EDGE_WIDTH: f64 = 12.0;
/// Red band rises around this wavelength.
const RED_EDGE_NM: f64 = 590.0;
const RED_EDGE_WIDTH: f64 = 10.0;

/// XYZ (D65) to linear sRGB, IEC 61966-2-1.
const XYZ_TO_LINEAR_SRGB: [[f64; 3]; 3] = [
    [3.2404542, -1.5371385, -0.4985314],
    [-0.9692660, 1.8760108, 0.0415560],
    [0.0556434, -0.2040259, 1.0572252],
];

/// Piecewise Gaussian lobe with different widths left and right of the peak.
fn lobe(wavelength: f64, peak: f64, sigma_left: f64, sigma_right: f64) -> f64 {
    let sigma = if wavelength < peak {
        sigma_left
    } else {
        sigma_right
    };
    let t = (wavelength - peak) / sigma;
    (-0.5 * t * t).exp()
}

/// CIE 1931 2° color matching functions, multi-lobe analytic fit
/// (Wyman, Sloan, Shirley 2013).
fn color_matching(wavelength: f64) -> [f64; 3] {
    let x = 1.056 * lobe(wavelength, 599.8, 37.9, 31.0) + 0.362 * lobe(wavelength, 442.0, 16.0, 26.7)
        - 0.065 * lobe(wavelength, 501.1, 20.4, 26.2);
    let y = 0.821 * lobe(wavelength, 568.8, 46.9, 40.5) + 0.286 * lobe(wavelength, 530.9, 16.3, 31.1);
    let z = 1.217 * lobe(wavelength, 437.0, 11.8, 36.0) + 0.681 * lobe(wavelength, 459.0, 26.0, 13.8);
    [x, y, z]
}

fn logistic(t: f64) -> f64 {
    1.0 / (1.0 + (-t).exp())
}

fn write_table(file: &mut File, doc: &str, name: &str, rows: &[[f64; SAMPLE_COUNT]; 3]) {
    writeln!(file, "{doc}").unwrap();
    writeln!(file, "pub static {name}: [[f64; SAMPLE_COUNT]; 3] = [").unwrap();
    for row in rows {
        write!(file, "    [").unwrap();
        for (i, value) in row.iter().enumerate() {
            if i % 6 == 0 {
                write!(file, "\n        ").unwrap();
            }
            write!(file, "{value:?}, ").unwrap();
        }
        writeln!(file, "\n    ],").unwrap();
    }
    writeln!(file, "];").unwrap();
    writeln!(file).unwrap();
}

fn main() {
    let out_dir = env::var("OUT_DIR").unwrap();
    let dest_path = Path::new(&out_dir).join("spectral_tables.rs");
    let mut file = File::create(&dest_path).unwrap();

    let wavelengths: Vec<f64> = (0..SAMPLE_COUNT)
        .map(|i| FIRST_WAVELENGTH_NM + STEP_NM * i as f64)
        .collect();

    // Per-sample contribution of reflectance to each linear sRGB channel.
    let mut weights = [[0.0f64; SAMPLE_COUNT]; 3];
    for (i, &wavelength) in wavelengths.iter().enumerate() {
        let xyz = color_matching(wavelength);
        for (channel, row) in XYZ_TO_LINEAR_SRGB.iter().enumerate() {
            weights[channel][i] = row[0] * xyz[0] + row[1] * xyz[1] + row[2] * xyz[2];
        }
    }
    // A flat 100% spectrum must map to linear white (1, 1, 1).
    for row in weights.iter_mut() {
        let sum: f64 = row.iter().sum();
        for value in row.iter_mut() {
            *value /= sum;
        }
    }

    // Reconstruction bands, ordered red, green, blue. They sum to 1 everywhere.
    let mut bands = [[0.0f64; SAMPLE_COUNT]; 3];
    for (i, &wavelength) in wavelengths.iter().enumerate() {
        let blue = 1.0 - logistic((wavelength - BLUE_EDGE_NM) / BLUE_EDGE_WIDTH);
        let red = logistic((wavelength - RED_EDGE_NM) / RED_EDGE_WIDTH);
        let green = (1.0 - blue - red).max(0.0);
        bands[0][i] = red;
        bands[1][i] = green;
        bands[2][i] = blue;
    }

    writeln!(file, "/// Number of wavelength samples in a reflectance spectrum").unwrap();
    writeln!(file, "pub const SAMPLE_COUNT: usize = {SAMPLE_COUNT};").unwrap();
    writeln!(file).unwrap();
    write_table(
        &mut file,
        "/// Reflectance to linear sRGB weights, one row per channel (R, G, B)",
        "RGB_WEIGHTS",
        &weights,
    );
    write_table(
        &mut file,
        "/// Smooth spectral bands used to reconstruct reflectance from linear sRGB (R, G, B)",
        "RECONSTRUCTION_BANDS",
        &bands,
    );

    println!("cargo:rerun-if-changed=build.rs");
}
