pub mod health_check_models;
