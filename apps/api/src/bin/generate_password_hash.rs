//! Prints a bcrypt hash suitable for `SEED_MANAGER_PASSWORD_HASH`.
//!
//! Usage: `generate_password_hash <password>` or with `SEED_MANAGER_PASSWORD` set.

fn main() -> anyhow::Result<()> {
    let password = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("SEED_MANAGER_PASSWORD").ok())
        .filter(|p| !p.is_empty())
        .ok_or_else(|| anyhow::anyhow!("usage: generate_password_hash <password>"))?;

    if password.len() < 8 {
        anyhow::bail!("password must be at least 8 characters");
    }

    let hash = bcrypt::hash(&password, bcrypt::DEFAULT_COST)?;
    println!("{}", hash);
    Ok(())
}
