//! Integration Test Utilities and Common Code

#![allow(dead_code)]

pub use assert_cmd::prelude::*;
pub use assert_fs::prelude::*;
pub use assert_fs::{fixture::ChildPath, TempDir};
pub use indoc::indoc;
pub use predicates::str::{is_empty, RegexPredicate};
pub use pretty_assertions::assert_eq;
pub use std::path::Path;
pub use std::process::Command;

/// Build a `Command` for the `lipidmatch` binary with variadic command-line arguments.
///
/// The arguments can be anything that is allowed by `Command::arg`.
#[macro_export]
macro_rules! lipidmatch {
    ( $( $arg:expr ),* ) => {
        {
            let mut cmd = lipidmatch_cmd();
            $(
                cmd.arg($arg);
            )*
            cmd
        }
    }
}

/// Build an `assert_cmd::assert::Assert` by calling `lipidmatch!(args).assert().success()`.
#[macro_export]
macro_rules! lipidmatch_success {
    ( $( $arg:expr ),* ) => { lipidmatch!($( $arg ),*).assert().success() }
}

/// Build an `assert_cmd::assert::Assert` by calling `lipidmatch!(args).assert().failure()`.
#[macro_export]
macro_rules! lipidmatch_failure {
    ( $( $arg:expr ),* ) => { lipidmatch!($( $arg ),*).assert().failure() }
}

/// Get the command for the `lipidmatch` binary under test.
pub fn lipidmatch_cmd() -> Command {
    Command::cargo_bin("lipidmatch-cli").expect("lipidmatch should be executable")
}

/// Create a `RegexPredicate` from the given pattern.
pub fn is_match(pat: &str) -> RegexPredicate {
    predicates::str::is_match(pat).expect("pattern should compile")
}

/// On-disk input fixture: a parsed dataset, a parsed reference database, and the
/// two constraint lists.
///
/// The dataset exercises every outcome partition: a level match, a fallback match
/// of an unparsed name, a synonym match, a constraint-filtered entry, and an
/// entry with no reference counterpart at all.
pub struct MatchScenario {
    pub root: TempDir,
}

impl MatchScenario {
    pub fn new() -> Self {
        let root = TempDir::new().expect("should be able to create temp dir");

        root.child("dataset.csv")
            .write_str(indoc! {"
                INDEX,ORIGINAL_NAME,PARSED_NAME,STATUS,MESSAGE,LEVEL,CATEGORY,CLASS,SPECIES,MOLECULAR_SPECIES,SN_POSITION,STRUCTURE_DEFINED,FULL_STRUCTURE,COMPLETE_STRUCTURE,FA1,FA2,FA3,FA4,LCB
                0,PC(34:1),PC 34:1,success,,SPECIES,GP,PC,PC 34:1,UNDEFINED,UNDEFINED,UNDEFINED,UNDEFINED,UNDEFINED,MISSING,MISSING,N/A,N/A,N/A
                1,Weird Lipid X,,failed,Name can not be parsed,,,,,,,,,,,,,,
                2,PS(44:12),PS 44:12,success,,SPECIES,GP,PS,PS 44:12,UNDEFINED,UNDEFINED,UNDEFINED,UNDEFINED,UNDEFINED,MISSING,MISSING,N/A,N/A,N/A
                3,GlcCer(d34:1),HexCer 34:1;2,success,,SPECIES,SP,HexCer,HexCer 34:1;2,UNDEFINED,UNDEFINED,UNDEFINED,UNDEFINED,UNDEFINED,MISSING,N/A,N/A,N/A,MISSING
                4,CL(72:8),CL 72:8,success,,SPECIES,GP,CL,CL 72:8,UNDEFINED,UNDEFINED,UNDEFINED,UNDEFINED,UNDEFINED,MISSING,MISSING,MISSING,MISSING,N/A
            "})
            .expect("should be able to write dataset fixture");

        root.child("database.csv")
            .write_str(indoc! {"
                INDEX,ORIGINAL_NAME,PARSED_NAME,STATUS,LEVEL,CATEGORY,CLASS,SPECIES,MOLECULAR_SPECIES,SN_POSITION,STRUCTURE_DEFINED,FULL_STRUCTURE,COMPLETE_STRUCTURE,FA1,FA2,FA3,FA4,LCB
                r0,PC 16:0/18:1,PC 16:0/18:1,success,SN_POSITION,GP,PC,PC 34:1,PC 16:0_18:1,PC 16:0/18:1,UNDEFINED,UNDEFINED,UNDEFINED,16:0,18:1,N/A,N/A,N/A
                r1,Weird Lipid X,CE 18:2,success,SPECIES,ST,CE,CE 18:2,UNDEFINED,UNDEFINED,UNDEFINED,UNDEFINED,UNDEFINED,18:2,N/A,N/A,N/A,N/A
                r2,PS 22:6/22:6,PS 22:6/22:6,success,SN_POSITION,GP,PS,PS 44:12,PS 22:6_22:6,PS 22:6/22:6,UNDEFINED,UNDEFINED,UNDEFINED,22:6,22:6,N/A,N/A,N/A
                r3,GlcCer 34:1;2,GlcCer 34:1;2,success,SPECIES,SP,GlcCer,GlcCer 34:1;2,UNDEFINED,UNDEFINED,UNDEFINED,UNDEFINED,UNDEFINED,16:0,N/A,N/A,N/A,18:1;2
            "})
            .expect("should be able to write database fixture");

        root.child("fa_constraints.txt")
            .write_str("16:0\n18:1\n18:2\n")
            .expect("should be able to write FA constraint fixture");

        root.child("lcb_constraints.txt")
            .write_str("18:1;2\n")
            .expect("should be able to write LCB constraint fixture");

        MatchScenario { root }
    }

    pub fn path(&self, name: &str) -> ChildPath {
        self.root.child(name)
    }

    /// The standard `match` invocation over this scenario's inputs.
    pub fn match_cmd(&self) -> Command {
        let mut cmd = lipidmatch_cmd();
        cmd.arg("match")
            .arg("--dataset")
            .arg(self.path("dataset.csv").path())
            .arg("--database")
            .arg(self.path("database.csv").path())
            .arg("--fa-constraints")
            .arg(self.path("fa_constraints.txt").path())
            .arg("--lcb-constraints")
            .arg(self.path("lcb_constraints.txt").path());
        cmd
    }
}
