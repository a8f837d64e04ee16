mod date_resolver;
mod document_id;
mod exif_reader;
mod exiftool_probe;
mod file_opener;
mod path_validator;
mod table_writer;

pub use date_resolver::{
    DATE_FORMAT, DateResolver, DateSource, EmbeddedExifDateSource, ExiftoolDateSource,
    FilesystemDateSource,
};
pub use document_id::{
    FINGERPRINT_LENGTH, METADATA_MARKER, image_document_id, metadata_document_id,
    path_fingerprint,
};
pub use exif_reader::read_embedded_date;
pub use exiftool_probe::{EXIFTOOL_DATE_TAGS, normalize_date_line, probe_date};
pub use file_opener::open_in_default_app;
pub use path_validator::{
    ensure_directory_exists, has_path_segment, relative_slash_path, to_slash_path,
    validate_directory_exists,
};
pub use table_writer::{write_csv_table, write_xlsx_table};
