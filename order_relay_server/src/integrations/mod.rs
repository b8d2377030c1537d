//! Adapters from the provider clients to the pipeline's collaborator traits.
pub mod whatsapp;
pub mod woocommerce;
