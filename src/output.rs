// output.rs - the PHYLIP-like distance matrix printer (SPEC_FULL.md 4.14)

use std::io::{self, Write};

/// Format one matrix cell: `nan` for a failed pair, scientific notation
/// for extreme values, four-decimal fixed notation otherwise.
fn format_cell(value: f64) -> String {
    if value.is_nan() {
        "nan".to_string()
    } else if value != 0.0 && (value.abs() < 1e-4 || value.abs() >= 1e5) {
        format!("{value:1.4e}")
    } else {
        format!("{value:1.4}")
    }
}

fn format_name(name: &str, width: usize) -> String {
    if name.len() >= width {
        name.to_string()
    } else {
        format!("{name:<width$}")
    }
}

/// Write one PHYLIP-like distance matrix: an integer subject count on its
/// own line, then one row per subject -- name padded to `name_width`,
/// followed by every column's formatted distance.
pub fn write_matrix<W: Write>(
    writer: &mut W,
    names: &[String],
    matrix: &[Vec<f64>],
    name_width: usize,
) -> io::Result<()> {
    writeln!(writer, "{}", names.len())?;
    for (i, name) in names.iter().enumerate() {
        write!(writer, "{}", format_name(name, name_width))?;
        for value in &matrix[i] {
            write!(writer, "  {}", format_cell(*value))?;
        }
        writeln!(writer)?;
    }
    Ok(())
}

/// Write a sequence of bootstrap-replicate matrices, each as its own
/// PHYLIP-like block separated by a blank line -- the format `seqboot`
/// style downstream tree tools expect a replicate stream in.
pub fn write_bootstrap_replicates<W: Write>(
    writer: &mut W,
    names: &[String],
    replicates: &[Vec<Vec<f64>>],
    name_width: usize,
) -> io::Result<()> {
    for (i, matrix) in replicates.iter().enumerate() {
        if i > 0 {
            writeln!(writer)?;
        }
        write_matrix(writer, names, matrix, name_width)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nan_cell_prints_as_nan() {
        assert_eq!(format_cell(f64::NAN), "nan");
    }

    #[test]
    fn ordinary_value_is_fixed_point() {
        assert_eq!(format_cell(0.1234), "0.1234");
    }

    #[test]
    fn tiny_value_is_scientific() {
        assert_eq!(format_cell(0.00001234), "1.2340e-5");
    }

    #[test]
    fn zero_is_fixed_point_not_scientific() {
        assert_eq!(format_cell(0.0), "0.0000");
    }

    #[test]
    fn matrix_header_is_subject_count() {
        let mut out = Vec::new();
        let names = vec!["a".to_string(), "b".to_string()];
        let matrix = vec![vec![0.0, 0.1], vec![0.1, 0.0]];
        write_matrix(&mut out, &names, &matrix, 10).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("2\n"));
    }

    #[test]
    fn name_is_padded_to_width() {
        let mut out = Vec::new();
        let names = vec!["ab".to_string()];
        let matrix = vec![vec![0.0]];
        write_matrix(&mut out, &names, &matrix, 10).unwrap();
        let text = String::from_utf8(out).unwrap();
        let first_line = text.lines().nth(1).unwrap();
        assert!(first_line.starts_with("ab        "));
    }

    #[test]
    fn bootstrap_blocks_are_blank_line_separated() {
        let mut out = Vec::new();
        let names = vec!["a".to_string()];
        let replicate = vec![vec![0.0]];
        let replicates = vec![replicate.clone(), replicate];
        write_bootstrap_replicates(&mut out, &names, &replicates, 10).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(text.matches("1\n").count(), 2);
    }
}
