mod observability;
mod text_processing;
