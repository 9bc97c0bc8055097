fn main() -> anyhow::Result<()> {
    rickmorty_router::main()
}
