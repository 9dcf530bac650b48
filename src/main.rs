fn main() -> std::io::Result<()> {
    dealvox_lib::run()
}
