use crate::registry::{table_reader, Registry};
use crate::Result;
use csv::StringRecord;
use std::path::Path;
use tracing::{debug, error, trace, warn};

/// Row counts from an export.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Exported {
    /// Data rows written (the header is not counted).
    pub rows: usize,

    /// Data rows dropped because their symbol is not in the registry.
    pub dropped: usize,
}

/// Re-read the table at `input` and write it to `output` with each symbol's values appended.
///
/// See [`export_to`] for the row rules.
pub fn export<S: AsRef<str>>(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    names: &[S],
    registry: &Registry,
) -> Result<Exported> {
    let (input, output) = (input.as_ref(), output.as_ref());
    let time = std::time::Instant::now();

    trace!("reading ticker table at path: {input:?}");
    let rdr = std::fs::File::open(input).map_err(|err| {
        error!("failed to open ticker table {input:?}, error({err})");
        err
    })?;

    trace!("creating output file at path: {output:?}");
    let wtr = std::fs::File::create(output).map_err(|err| {
        error!("failed to create output file {output:?}, error({err})");
        err
    })?;

    let exported = export_to(rdr, wtr, names, registry)?;
    debug!(
        "{} rows written to {output:?}, {} dropped. {}",
        exported.rows,
        exported.dropped,
        crate::time_elapsed(time)
    );

    Ok(exported)
}

/// Stream the input table to `wtr`, row by row, in input order.
///
/// - The header row is written with the metric `names` appended; a header that is not valid
///   UTF-8 is replaced by a single empty field.
/// - A data row whose first column is a registry key is written with that key's values
///   appended. Any other data row is dropped.
///
/// Rows are written as they are read; an error part way leaves a partial output behind.
pub fn export_to<R, W, S>(rdr: R, wtr: W, names: &[S], registry: &Registry) -> Result<Exported>
where
    R: std::io::Read,
    W: std::io::Write,
    S: AsRef<str>,
{
    let mut reader = table_reader(rdr);
    let mut writer = csv::WriterBuilder::new()
        .flexible(true)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(wtr);
    let mut exported = Exported::default();

    for (i, record) in reader.byte_records().enumerate() {
        let mut record = record?;

        // header: extend with the metric names
        if i == 0 {
            match StringRecord::from_byte_record(record) {
                Ok(mut header) => {
                    header.extend(names);
                    writer.write_record(&header)?;
                }
                Err(err) => {
                    warn!("header row is not valid UTF-8, writing an empty row instead, error({err})");
                    writer.write_record([""])?;
                }
            }
            continue;
        }

        let symbol = record.get(0).map(String::from_utf8_lossy);
        match symbol.as_deref().and_then(|symbol| registry.get(symbol)) {
            Some(values) => {
                record.extend(values);
                writer.write_byte_record(&record)?;
                exported.rows += 1;
            }
            None => {
                trace!("row {i} ({symbol:?}) matches no ticker, dropping it");
                exported.dropped += 1;
            }
        }
    }

    writer.flush()?;
    Ok(exported)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(input: &[u8], names: &[&str], registry: &Registry) -> (String, Exported) {
        let mut out = Vec::new();
        let exported = export_to(input, &mut out, names, registry).unwrap();
        (String::from_utf8(out).unwrap(), exported)
    }

    #[test]
    fn appends_values_in_input_order() {
        let input = "Symbol,Name\nBBB,Beta Inc\nAAA,Alpha Inc\n";
        let mut registry = Registry::new();
        registry.insert_if_absent("AAA");
        registry.insert_if_absent("BBB");
        registry.fill("AAA", vec!["1.2".into(), "3B".into()]).unwrap();
        registry.fill("BBB", vec!["N/A".into(), "N/A".into()]).unwrap();

        let (out, exported) = run(input.as_bytes(), &["Beta", "Market Cap"], &registry);
        assert_eq!(
            out,
            "Symbol,Name,Beta,Market Cap\nBBB,Beta Inc,N/A,N/A\nAAA,Alpha Inc,1.2,3B\n"
        );
        assert_eq!(exported, Exported { rows: 2, dropped: 0 });
    }

    #[test]
    fn unknown_rows_are_dropped() {
        let input = "Symbol,Name\nAAA,Alpha Inc\nZZZ,Zeta Inc\n";
        let mut registry = Registry::new();
        registry.insert_if_absent("AAA");
        registry.fill("AAA", vec!["1.2".into()]).unwrap();

        let (out, exported) = run(input.as_bytes(), &["Beta"], &registry);
        assert_eq!(out, "Symbol,Name,Beta\nAAA,Alpha Inc,1.2\n");
        assert_eq!(exported, Exported { rows: 1, dropped: 1 });
    }

    #[test]
    fn duplicate_rows_share_values() {
        let input = "Symbol\nAAA\nAAA\n";
        let mut registry = Registry::new();
        registry.insert_if_absent("AAA");
        registry.fill("AAA", vec!["1.2".into()]).unwrap();

        let (out, _) = run(input.as_bytes(), &["Beta"], &registry);
        assert_eq!(out, "Symbol,Beta\nAAA,1.2\nAAA,1.2\n");
    }

    #[test]
    fn values_needing_quotes_are_quoted() {
        let input = "Symbol\nAAA\n";
        let mut registry = Registry::new();
        registry.insert_if_absent("AAA");
        registry.fill("AAA", vec!["2:1".into(), "1,234".into()]).unwrap();

        let (out, _) = run(input.as_bytes(), &["Last Split Factor", "Float"], &registry);
        assert_eq!(out, "Symbol,Last Split Factor,Float\nAAA,2:1,\"1,234\"\n");
    }

    #[test]
    fn undecodable_header_becomes_empty_row() {
        let input = b"Sym\xffbol,Name\nAAA,Alpha Inc\n";
        let mut registry = Registry::new();
        registry.insert_if_absent("AAA");
        registry.fill("AAA", vec!["1.2".into()]).unwrap();

        let (out, exported) = run(input, &["Beta"], &registry);
        assert_eq!(out, "\"\"\nAAA,Alpha Inc,1.2\n");
        assert_eq!(exported.rows, 1);
    }
}
