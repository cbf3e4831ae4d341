pub mod code_record;
pub mod parsed_url;
pub mod variant;
