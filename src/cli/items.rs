use anyhow::Result;

use unforgettable::reminder::{Condition, ItemStore, NewItem};

use super::AppContext;

pub async fn add(ctx: &AppContext, name: &str, condition: Condition) -> Result<()> {
    let user = ctx.user().await?;
    let item = ctx.items.create(&user.id, NewItem::new(name, condition))?;
    println!("Added {} ({}) [{}]", item.name, condition.label(), item.id);
    Ok(())
}

pub async fn list(ctx: &AppContext) -> Result<()> {
    let user = ctx.user().await?;
    let items = ctx.items.list(&user.id)?;

    if items.is_empty() {
        println!("No items added yet");
        return Ok(());
    }

    for item in &items {
        println!("  {:<38} {:<24} {}", item.id, item.name, item.condition.label());
    }
    Ok(())
}

pub async fn remove(ctx: &AppContext, id: &str) -> Result<()> {
    let user = ctx.user().await?;
    ctx.items.delete(&user.id, id)?;
    println!("Removed {id}");
    Ok(())
}
