//! End-to-end integration tests
//!
//! These tests run the complete settlement pipeline on predefined CSV
//! fixtures. Each test:
//! 1. Reads members.csv and transactions.csv from a fixture directory
//! 2. Settles every group with the selected strategy
//! 3. Writes the CSV report
//! 4. Compares actual output with expected.csv
//!
//! Test fixtures are located in tests/fixtures/ and cover:
//! - A single expense split across a group
//! - Groups that are already settled
//! - Incomes reducing every share
//! - Several independent groups
//! - Shares that do not divide evenly
//! - Malformed rows, duplicate members and unknown payers
//! - A period window
//!
//! Each test is run twice: once with the synchronous strategy and once with the async one.

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use split_ledger::cli::StrategyType;
    use split_ledger::io::OutputFormat;
    use split_ledger::strategy::{create_strategy, BatchConfig, LedgerInput, LedgerOptions};
    use split_ledger::types::Period;
    use std::fs;
    use std::io::Write;
    use std::path::Path;
    use tempfile::NamedTempFile;

    /// Run a fixture and compare the CSV report with expected.csv
    ///
    /// # Panics
    ///
    /// Panics if a fixture file cannot be read or the output differs.
    fn run_test_fixture(fixture_name: &str, strategy_type: StrategyType, options: LedgerOptions) {
        let fixture_dir = format!("tests/fixtures/{}", fixture_name);
        let members_path = format!("{}/members.csv", fixture_dir);
        let transactions_path = format!("{}/transactions.csv", fixture_dir);
        let expected_path = format!("{}/expected.csv", fixture_dir);

        for path in [&members_path, &transactions_path, &expected_path] {
            assert!(Path::new(path).exists(), "Fixture file not found: {}", path);
        }

        // Small batches so async runs cross batch boundaries
        let config = match strategy_type {
            StrategyType::Sync => None,
            StrategyType::Async => Some(BatchConfig::new(3, 2)),
        };
        let strategy = create_strategy(strategy_type, config, options);

        let mut temp_output = NamedTempFile::new().expect("Failed to create temp file");
        strategy
            .process(
                &LedgerInput::new(&members_path, &transactions_path),
                &mut temp_output,
            )
            .unwrap_or_else(|e| panic!("Failed to settle ledger: {}", e));
        temp_output.flush().expect("Failed to flush temp file");

        let actual_output = fs::read_to_string(temp_output.path())
            .unwrap_or_else(|e| panic!("Failed to read temp output file: {}", e));
        let expected_output = fs::read_to_string(&expected_path)
            .unwrap_or_else(|e| panic!("Failed to read expected file {}: {}", expected_path, e));

        assert_eq!(
            actual_output, expected_output,
            "\n\nOutput mismatch for fixture: {} (strategy: {:?})\n\nActual output:\n{}\n\nExpected output:\n{}\n",
            fixture_name, strategy_type, actual_output, expected_output
        );
    }

    fn csv_options() -> LedgerOptions {
        LedgerOptions {
            format: OutputFormat::Csv,
            ..LedgerOptions::default()
        }
    }

    /// End-to-end test for all fixtures with both strategies
    #[rstest]
    #[case("single_expense")]
    #[case("equal_payments")]
    #[case("income_and_expenses")]
    #[case("multiple_groups")]
    #[case("uneven_split")]
    #[case("many_members")]
    #[case("malformed_data")]
    fn test_fixtures(
        #[case] fixture: &str,
        #[values(StrategyType::Sync, StrategyType::Async)] strategy: StrategyType,
    ) {
        run_test_fixture(fixture, strategy, csv_options());
    }

    #[rstest]
    fn test_period_window_fixture(
        #[values(StrategyType::Sync, StrategyType::Async)] strategy: StrategyType,
    ) {
        let options = LedgerOptions {
            period: Some(Period {
                month: 3,
                year: 2024,
            }),
            ..csv_options()
        };
        run_test_fixture("monthly_window", strategy, options);
    }

    #[rstest]
    fn test_json_report_shape(
        #[values(StrategyType::Sync, StrategyType::Async)] strategy: StrategyType,
    ) {
        let strategy = create_strategy(strategy, None, LedgerOptions::default());
        let input = LedgerInput::new(
            "tests/fixtures/single_expense/members.csv",
            "tests/fixtures/single_expense/transactions.csv",
        );
        let mut output = Vec::new();
        strategy.process(&input, &mut output).unwrap();

        let report: serde_json::Value = serde_json::from_slice(&output).unwrap();
        let groups = report["groups"].as_array().unwrap();
        assert_eq!(groups.len(), 1);

        let group = &groups[0];
        assert_eq!(group["group"], "trip");
        assert_eq!(group["userBalances"].as_array().unwrap().len(), 3);
        assert_eq!(group["userBalances"][0]["userId"], "alice");
        assert_eq!(group["userBalances"][0]["balance"].as_f64(), Some(200.0));
        assert_eq!(group["summary"]["totalExpense"].as_f64(), Some(300.0));

        let settlements = group["settlements"].as_array().unwrap();
        assert_eq!(settlements.len(), 2);
        for settlement in settlements {
            assert_eq!(settlement["amount"].as_f64(), Some(100.0));
            assert_eq!(settlement["to"]["userId"], "alice");
            assert_ne!(settlement["from"]["userId"], settlement["to"]["userId"]);
        }
    }
}
