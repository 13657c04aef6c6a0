#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

pub const BANK_MANIFEST: &str = r#"
module: bank_specs
sources: [src/account.rs]
types:
  - full_name: bank_specs::describe_account
    base: nspec
    attributes:
      - { name: tag, value: accounts }
    methods:
      - name: before_each
      - name: it_starts_empty
      - name: xit_supports_overdraft
      - name: when_depositing
        declarations:
          - context: with a positive amount
            declarations:
              - example: increases the balance
                tags: [slow]
symbols:
  - { type: bank_specs::describe_account, method: it_starts_empty, file: src/account.rs, line: 12 }
  - { type: bank_specs::describe_account, method: it_starts_empty, file: src/account.rs, line: 9 }
"#;

pub const ACCOUNT_SOURCE: &str = r#"pub struct describe_account;

impl describe_account {
    pub fn before_each(&mut self) {}

    pub fn it_starts_empty(&self) {}

    pub fn xit_supports_overdraft(&self) {}

    pub fn when_depositing(&mut self) {}
}
"#;

pub const LEDGER_MANIFEST: &str = r#"{
  "module": "ledger_specs",
  "types": [
    { "full_name": "ledger_specs::describe_ledger", "base": "nspec",
      "methods": [ { "name": "it_balances" } ] }
  ]
}"#;

/// Writes the bank manifest and its Rust source under `dir`.
pub fn write_bank(dir: &Path) -> PathBuf {
    fs::create_dir_all(dir.join("src")).unwrap();
    fs::write(dir.join("src/account.rs"), ACCOUNT_SOURCE).unwrap();
    write(dir, "bank.specs.yaml", BANK_MANIFEST)
}

pub fn write_ledger(dir: &Path) -> PathBuf {
    write(dir, "ledger.specs.json", LEDGER_MANIFEST)
}

pub fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}
