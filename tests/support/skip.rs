/// Skip a test if the gpg CLI is not installed.
#[macro_export]
macro_rules! skip_without_gpg {
    () => {
        if std::process::Command::new("gpg")
            .arg("--version")
            .output()
            .map(|o| !o.status.success())
            .unwrap_or(true)
        {
            eprintln!("SKIPPED: gpg not installed");
            return;
        }
    };
}

/// Skip a test if the pass CLI is not installed.
#[macro_export]
macro_rules! skip_without_pass {
    () => {
        if std::process::Command::new("pass")
            .arg("version")
            .output()
            .map(|o| !o.status.success())
            .unwrap_or(true)
        {
            eprintln!("SKIPPED: pass not installed");
            return;
        }
    };
}
