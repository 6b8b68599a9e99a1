#[cfg(test)]
mod tests {
    use super::super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_serve_top_five_on_port_5000() {
        let config = Config::default();
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.ranking.top_k, 5);
        assert!(config.server.cors);
        assert!(!config.model.use_gpu);
    }

    #[test]
    fn test_empty_toml_yields_defaults() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.model.weights_path, "model/svc.safetensors");
        assert_eq!(config.knowledge.precautions_path, "data/symptom_precaution.csv");
    }

    #[test]
    fn test_partial_section_keeps_other_defaults() {
        let config = Config::from_toml_str(
            r#"
            [server]
            port = 8080

            [knowledge]
            descriptions_path = "/srv/desc.csv"
            "#,
        )
        .unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.knowledge.descriptions_path, "/srv/desc.csv");
        assert_eq!(config.knowledge.precautions_path, "data/symptom_precaution.csv");
        assert_eq!(config.bind_addr(), "127.0.0.1:8080");
    }

    #[test]
    fn test_model_kind_defaults_to_linear() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config.model.kind, ModelKind::Linear);
        assert_eq!(config.model.header_path, "model/svc_header.json");

        let config = Config::from_toml_str("[model]\nkind = \"svc\"").unwrap();
        assert_eq!(config.model.kind, ModelKind::Svc);
        assert_eq!(config.model.weights_path, "model/svc.safetensors");
    }

    #[test]
    fn test_unknown_model_kind_rejected() {
        let err = Config::from_toml_str("[model]\nkind = \"forest\"").unwrap_err();
        assert!(matches!(err, MedirankError::Config(_)));
    }

    #[test]
    fn test_malformed_toml_is_config_error() {
        let err = Config::from_toml_str("[server]\nport = \"not a number\"").unwrap_err();
        assert!(matches!(err, MedirankError::Config(_)));
    }

    #[test]
    fn test_zero_top_k_rejected() {
        let config = Config::from_toml_str("[ranking]\ntop_k = 0").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[model]\nclasses_path = \"labels.json\"\nuse_gpu = true").unwrap();
        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.model.classes_path, "labels.json");
        assert!(config.model.use_gpu);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = Config::from_file("/definitely/not/here/medirank.toml").unwrap_err();
        assert!(matches!(err, MedirankError::Io(_)));
    }
}
