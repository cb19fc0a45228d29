// Copyright takubokudori.
// This source code is licensed under the MIT or Apache-2.0 license.
#[cfg(test)]
mod tests {
    use std::io::Write;
    use vboxss::{config::Config, resolve::NameFallback, types::ErrorKind};

    fn is_invalid_config<T: std::fmt::Debug>(r: vboxss::types::VmResult<T>) -> bool {
        matches!(r.unwrap_err().kind(), ErrorKind::InvalidConfig(_))
    }

    #[test]
    fn test_default() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(Config::default(), config);
        assert_eq!("vboxmanage", config.executable_path);
        assert_eq!(NameFallback::Lenient, config.fallback());
        assert_eq!(encoding_rs::UTF_8, config.encoding().unwrap());
        let cmd = config.vboxmanage().unwrap();
        assert_eq!("vboxmanage", cmd.get_executable_path());
    }

    #[test]
    fn test_read() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            f,
            r#"executable_path = "C:\\Program Files\\Oracle\\VirtualBox\\VBoxManage.exe"
encoding = "shift_jis"
strict = true
short_name_pattern = "^(.+)-[0-9]+$""#
        )
        .unwrap();
        let config = Config::load(Some(f.path())).unwrap();
        assert_eq!(
            "C:\\Program Files\\Oracle\\VirtualBox\\VBoxManage.exe",
            config.executable_path
        );
        assert_eq!(encoding_rs::SHIFT_JIS, config.encoding().unwrap());
        assert_eq!(NameFallback::Strict, config.fallback());
        assert!(config.vboxmanage().is_ok());
    }

    #[test]
    fn test_invalid() {
        assert!(is_invalid_config(Config::from_toml("strict = \"yes\"")));
        assert!(is_invalid_config(Config::from_toml("unknown_key = 1")));
        assert!(is_invalid_config(Config::read("/nonexistent/vboxss.toml")));

        let config = Config {
            encoding: "no-such-encoding".to_string(),
            ..Config::default()
        };
        assert!(is_invalid_config(config.encoding()));
        assert!(is_invalid_config(config.vboxmanage()));

        let config = Config {
            short_name_pattern: "[".to_string(),
            ..Config::default()
        };
        assert!(is_invalid_config(config.vboxmanage()));
    }
}
