// Usage: qtest <dump|diff|strategy|check|encode> ...

fn main() {
    qtest::cli::run();
}
