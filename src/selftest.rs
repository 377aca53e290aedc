//! Built-in suites the `trellis run` command executes.
//!
//! These are ordinary registered suites; they exercise the humanizer through the engine itself.

use thiserror::Error;
use trellis_humanize::{HumanizeExt, HumanizeNumberFormatter, Multiple};

use crate::failure::MethodResult;
use crate::loader::ModuleCatalog;
use crate::suite::{Method, Module, Suite, SuiteType};

/// Name of the built-in module.
pub const MODULE_NAME: &str = "trellis.selftest";

/// File name the built-in module is registered under in [`catalog`].
pub const MODULE_FILE: &str = "selftest.suite";

/// A value did not match its expectation.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("{what}: expected `{expected}`, got `{actual}`")]
pub struct Mismatch {
    pub what: String,
    pub expected: String,
    pub actual: String,
}

fn check_eq(what: impl Into<String>, expected: &str, actual: &str) -> MethodResult {
    if expected == actual {
        Ok(())
    } else {
        Err(Mismatch {
            what: what.into(),
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
        .into())
    }
}

struct Case {
    integer: i64,
    decimal: &'static str,
    binary: &'static str,
}

const CASES: &[Case] = &[
    Case {
        integer: 1000,
        decimal: "1.000k",
        binary: "1000.000",
    },
    Case {
        integer: 1024,
        decimal: "1.024k",
        binary: "1.000Ki",
    },
];

/// Humanizer suite.
#[derive(Debug, Default)]
pub struct HumanizeTests {
    formatter: Option<HumanizeNumberFormatter>,
}

impl HumanizeTests {
    pub fn init(&mut self) -> MethodResult {
        self.formatter = Some(HumanizeNumberFormatter::new());
        Ok(())
    }

    pub fn to_string_test(&mut self) -> MethodResult {
        for case in CASES {
            check_eq(
                format!("{} as decimal", case.integer),
                case.decimal,
                &case.integer.humanize(Multiple::Decimal),
            )?;
            check_eq(
                format!("{} as binary", case.integer),
                case.binary,
                &case.integer.humanize(Multiple::Binary),
            )?;
        }
        Ok(())
    }

    pub fn format_test(&mut self) -> MethodResult {
        let formatter = self.formatter.unwrap_or_default();
        for case in CASES {
            for (spec, expected) in [(Some("D"), case.decimal), (Some("B"), case.binary), (None, case.binary)] {
                let actual = formatter.format(spec, case.integer).unwrap_or_default();
                check_eq(format!("{} with {:?}", case.integer, spec), expected, &actual)?;
            }
        }
        Ok(())
    }

    pub fn cleanup(&mut self) -> MethodResult {
        self.formatter = None;
        Ok(())
    }
}

impl Suite for HumanizeTests {
    fn suite_type() -> SuiteType {
        SuiteType::builder::<HumanizeTests>("trellis::selftest::HumanizeTests")
            .suite()
            .default_constructor()
            .method(Method::new("init", HumanizeTests::init).setup())
            .method(Method::new("to_string_test", HumanizeTests::to_string_test).test())
            .method(Method::new("format_test", HumanizeTests::format_test).test())
            .method(Method::new("cleanup", HumanizeTests::cleanup).teardown())
            .build()
    }
}

/// Holds the cases; registered in the module but never tagged as a suite.
pub struct CaseTable;

impl CaseTable {
    fn suite_type() -> SuiteType {
        SuiteType::builder::<CaseTable>("trellis::selftest::CaseTable")
            .constructor(|| Ok(CaseTable))
            .method(Method::new("len", |_: &mut CaseTable| Ok(())).test())
            .build()
    }
}

/// The built-in module.
pub fn module() -> Module {
    Module::new(MODULE_NAME)
        .with_type(HumanizeTests::suite_type())
        .with_type(CaseTable::suite_type())
}

/// Catalog of every built-in module, for directory-based discovery.
pub fn catalog() -> ModuleCatalog<Module> {
    ModuleCatalog::new().with(MODULE_FILE, module())
}
