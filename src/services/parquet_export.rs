//! Parquet encoding of the cache table
//!
//! Every column is a non-nullable UTF-8 string named after the matching
//! `VinRecord` field, so the file loads straight into a data frame.

use arrow_array::{ArrayRef, RecordBatch, StringArray};
use arrow_schema::{DataType, Field, Schema, SchemaRef};
use bytes::Bytes;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;
use std::sync::Arc;

use crate::errors::AppResult;
use crate::models::VinRecord;

pub const PARQUET_CONTENT_TYPE: &str = "application/vnd.apache.parquet";

pub const COLUMNS: [&str; 5] = ["vin", "make", "model", "model_year", "body_class"];

pub fn vin_record_schema() -> SchemaRef {
    Arc::new(Schema::new(
        COLUMNS
            .iter()
            .map(|name| Field::new(*name, DataType::Utf8, false))
            .collect::<Vec<_>>(),
    ))
}

fn string_column<'a>(
    records: &'a [VinRecord],
    value: impl Fn(&'a VinRecord) -> &'a str,
) -> ArrayRef {
    Arc::new(StringArray::from_iter_values(records.iter().map(value)))
}

/// Encode records as a single-row-group Parquet file
pub fn encode_records(records: &[VinRecord]) -> AppResult<Bytes> {
    let schema = vin_record_schema();
    let properties = WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .build();

    let mut buffer = Vec::new();
    let mut writer = ArrowWriter::try_new(&mut buffer, schema.clone(), Some(properties))?;

    // An empty table is just the footer with the schema and zero row groups
    if !records.is_empty() {
        let batch = RecordBatch::try_new(
            schema,
            vec![
                string_column(records, |r| r.vin.as_str()),
                string_column(records, |r| r.make.as_str()),
                string_column(records, |r| r.model.as_str()),
                string_column(records, |r| r.model_year.as_str()),
                string_column(records, |r| r.body_class.as_str()),
            ],
        )?;
        writer.write(&batch)?;
    }
    writer.close()?;

    Ok(Bytes::from(buffer))
}

#[cfg(test)]
mod tests {
    use super::*;
    use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

    fn record(vin: &str, make: &str) -> VinRecord {
        VinRecord {
            vin: vin.to_string(),
            make: make.to_string(),
            model: "Model".to_string(),
            model_year: "2020".to_string(),
            body_class: "Sedan/Saloon".to_string(),
        }
    }

    fn column_values(batch: &RecordBatch, name: &str) -> Vec<String> {
        batch
            .column_by_name(name)
            .unwrap()
            .as_any()
            .downcast_ref::<StringArray>()
            .unwrap()
            .iter()
            .map(|v| v.unwrap().to_string())
            .collect()
    }

    #[test]
    fn test_empty_export_is_valid_parquet() {
        let bytes = encode_records(&[]).unwrap();

        assert_eq!(&bytes[..4], b"PAR1");
        let builder = ParquetRecordBatchReaderBuilder::try_new(bytes).unwrap();
        assert_eq!(builder.metadata().file_metadata().num_rows(), 0);
        let field_names: Vec<String> = builder
            .schema()
            .fields()
            .iter()
            .map(|f| f.name().clone())
            .collect();
        assert_eq!(field_names, COLUMNS);

        let rows: usize = builder.build().unwrap().map(|b| b.unwrap().num_rows()).sum();
        assert_eq!(rows, 0);
    }

    #[test]
    fn test_export_round_trips_rows() {
        let records = vec![
            record("1XPWD40X1ED215307", "PETERBILT"),
            record("5YJ3E1EA7KF317000", "TESLA"),
            record("JH4KA7561PC008269", "ACURA"),
        ];

        let bytes = encode_records(&records).unwrap();
        let reader = ParquetRecordBatchReaderBuilder::try_new(bytes)
            .unwrap()
            .build()
            .unwrap();
        let batches: Vec<RecordBatch> = reader.map(|b| b.unwrap()).collect();

        let total: usize = batches.iter().map(|b| b.num_rows()).sum();
        assert_eq!(total, 3);
        let batch = &batches[0];
        assert_eq!(
            column_values(batch, "vin"),
            vec!["1XPWD40X1ED215307", "5YJ3E1EA7KF317000", "JH4KA7561PC008269"]
        );
        assert_eq!(column_values(batch, "make"), vec!["PETERBILT", "TESLA", "ACURA"]);
        assert_eq!(column_values(batch, "body_class")[1], "Sedan/Saloon");
    }
}
