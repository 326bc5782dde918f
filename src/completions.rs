use std::io::{self, Write};
use std::path::PathBuf;

use clap_complete::{generate, Shell};

pub fn generate_completions(shell: Shell, buf: &mut dyn Write) {
    let mut cmd = crate::cli::styled_command();
    generate(shell, &mut cmd, "sbk", buf);
}

pub fn detect_current_shell() -> Option<Shell> {
    let shell_var = std::env::var("SHELL").ok()?;
    let basename = shell_var.rsplit('/').next()?;
    match basename {
        "bash" => Some(Shell::Bash),
        "zsh" => Some(Shell::Zsh),
        "fish" => Some(Shell::Fish),
        "elvish" => Some(Shell::Elvish),
        "powershell" | "pwsh" => Some(Shell::PowerShell),
        _ => None,
    }
}

fn completions_install_path_for_home(shell: Shell, home: &std::path::Path) -> Option<PathBuf> {
    match shell {
        Shell::Bash => {
            let dir = home.join(".local/share/bash-completion/completions");
            Some(dir.join("sbk"))
        }
        Shell::Zsh => {
            let dir = home.join(".config/sitebook/completions");
            Some(dir.join("sbk.zsh"))
        }
        Shell::Fish => {
            let dir = home.join(".config/fish/completions");
            Some(dir.join("sbk.fish"))
        }
        _ => None,
    }
}

pub fn install_completions(shell: Shell) -> io::Result<PathBuf> {
    let home = std::env::var("HOME").map_err(|e| io::Error::new(io::ErrorKind::NotFound, e))?;
    let home = PathBuf::from(home);

    let path = completions_install_path_for_home(shell, &home).ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::Unsupported,
            format!("no install path for {shell:?}"),
        )
    })?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut buf = Vec::new();
    generate_completions(shell, &mut buf);
    std::fs::write(&path, buf)?;

    if shell == Shell::Zsh {
        patch_zshrc(&home, &path)?;
    }

    Ok(path)
}

fn patch_zshrc(home: &std::path::Path, completions_path: &std::path::Path) -> io::Result<()> {
    let zshrc = home.join(".zshrc");
    let source_line = format!("source \"{}\"", completions_path.display());

    if zshrc.exists() {
        let content = std::fs::read_to_string(&zshrc)?;
        if content.contains(&source_line) {
            return Ok(());
        }
    }

    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&zshrc)?;
    writeln!(file)?;
    writeln!(file, "# sbk shell completions")?;
    writeln!(file, "{source_line}")?;
    Ok(())
}

fn parse_shell(raw: &str) -> Option<Shell> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "bash" => Some(Shell::Bash),
        "zsh" => Some(Shell::Zsh),
        "fish" => Some(Shell::Fish),
        "elvish" => Some(Shell::Elvish),
        "powershell" | "pwsh" => Some(Shell::PowerShell),
        _ => None,
    }
}

pub fn run_completions_command(
    shell_arg: Option<&str>,
    install: bool,
) -> Result<(), crate::app::AppError> {
    let shell = if let Some(name) = shell_arg {
        parse_shell(name).ok_or_else(|| {
            crate::app::AppError::InvalidArgument(format!("unknown shell '{name}'"))
        })?
    } else {
        detect_current_shell().ok_or_else(|| {
            crate::app::AppError::InvalidArgument(
                "unable to detect shell from $SHELL; pass a shell name".to_string(),
            )
        })?
    };

    if install {
        let path = install_completions(shell)?;
        println!("completions installed to {}", path.display());
    } else {
        let mut stdout = io::stdout().lock();
        generate_completions(shell, &mut stdout);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completions_install_path_for_known_shells() {
        let home = PathBuf::from("/tmp/test-home");
        let bash = completions_install_path_for_home(Shell::Bash, &home);
        assert!(bash.unwrap().to_str().unwrap().contains("bash-completion"));
        let zsh = completions_install_path_for_home(Shell::Zsh, &home);
        assert!(zsh.unwrap().to_str().unwrap().contains("sbk.zsh"));
        let fish = completions_install_path_for_home(Shell::Fish, &home);
        assert!(fish.unwrap().to_str().unwrap().contains("sbk.fish"));
    }

    #[test]
    fn completions_install_path_returns_none_for_unsupported_shell() {
        let home = PathBuf::from("/tmp/test-home");
        assert!(completions_install_path_for_home(Shell::Elvish, &home).is_none());
        assert!(completions_install_path_for_home(Shell::PowerShell, &home).is_none());
    }

    #[test]
    fn generate_completions_produces_non_empty_output() {
        let mut buf = Vec::new();
        generate_completions(Shell::Bash, &mut buf);
        assert!(!buf.is_empty(), "bash completions should be non-empty");
        let text = String::from_utf8_lossy(&buf);
        assert!(text.contains("sbk"), "bash completions should reference sbk");
    }

    #[test]
    fn parse_shell_is_case_insensitive() {
        assert_eq!(parse_shell("BASH"), Some(Shell::Bash));
        assert_eq!(parse_shell("Zsh"), Some(Shell::Zsh));
        assert_eq!(parse_shell("Fish"), Some(Shell::Fish));
        assert_eq!(parse_shell("pwsh"), Some(Shell::PowerShell));
        assert_eq!(parse_shell("nonsense"), None);
    }
}
