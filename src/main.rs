fn main() -> anyhow::Result<()> {
    modgen_lib::run()
}
