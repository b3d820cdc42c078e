use assert_cmd::Command;

#[test]
fn running_a_file_prints_its_output_and_exits_zero() {
    Command::cargo_bin("lox")
        .unwrap()
        .arg("tests/fixtures/hello.lox")
        .assert()
        .success()
        .stdout("hello, lox\n");
}

#[test]
fn a_runtime_error_exits_70() {
    Command::cargo_bin("lox")
        .unwrap()
        .arg("tests/fixtures/runtime_error.lox")
        .assert()
        .code(70);
}

#[test]
fn a_static_error_exits_65() {
    Command::cargo_bin("lox")
        .unwrap()
        .arg("tests/fixtures/parse_error.lox")
        .assert()
        .code(65);
}

#[test]
fn more_than_one_argument_exits_64_with_a_usage_message() {
    Command::cargo_bin("lox")
        .unwrap()
        .arg("one.lox")
        .arg("two.lox")
        .assert()
        .code(64)
        .stdout("Usage: lox [script]\n");
}

#[test]
fn a_missing_file_exits_64() {
    Command::cargo_bin("lox")
        .unwrap()
        .arg("tests/fixtures/does_not_exist.lox")
        .assert()
        .code(64);
}
