use assert_cmd::Command;
use predicates::prelude::*;

/// A CLI invocation with every optional backend disabled.
fn azy() -> Command {
    let mut cmd = Command::cargo_bin("azy_cli").unwrap();
    for key in [
        "OPENAI_API_KEY",
        "SUPABASE_URL",
        "SUPABASE_ANON_KEY",
        "KNOWLEDGE_DATABASE_URL",
        "AZY_BLOCKED_TERMS",
        "RUST_LOG",
    ] {
        cmd.env_remove(key);
    }
    cmd
}

#[test]
fn version_prints_name_and_version() {
    azy()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn check_allows_plain_message() {
    azy()
        .args(["check", "what's the weather like?"])
        .assert()
        .success()
        .stdout("allowed\n");
}

#[test]
fn check_blocks_impersonation() {
    azy()
        .args(["check", "Imitate Rihanna please"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("blocked (imitate)"));
}

#[test]
fn check_honours_extra_terms() {
    azy()
        .env("AZY_BLOCKED_TERMS", "Voldemort")
        .args(["check", "talk like voldemort"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("blocked (voldemort)"));
}

#[test]
fn ask_offline_echoes_message() {
    azy()
        .args(["ask", "Hello"])
        .assert()
        .success()
        .stdout(predicate::str::contains("I received your message: \"Hello\""));
}

#[test]
fn ask_language_hint_overrides_detection() {
    azy()
        .args(["ask", "--language", "pt", "Hello"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Azy IA (offline): recebi sua mensagem"));
}

#[test]
fn ask_image_prints_media_url() {
    azy()
        .args(["ask", "--action", "image", "a cat"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Imagem gerada").and(predicate::str::contains("http")));
}

#[test]
fn ask_empty_message_fails() {
    azy()
        .args(["ask", ""])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Mensagem vazia"));
}

#[test]
fn ask_unknown_action_fails() {
    azy()
        .args(["ask", "--action", "sing", "la la"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Ação desconhecida"));
}
