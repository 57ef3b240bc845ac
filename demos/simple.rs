use extendible_hash::ExtendibleHashTable;

fn main() -> extendible_hash::Result<()> {
    let mut table = ExtendibleHashTable::<u64, String>::new();

    for key in [5, 13, 21] {
        table.insert(key, format!("value-{}", key))?;
    }
    println!("{}", table.layout());

    // the fourth key overflows the only bucket
    table.insert(2, "two".to_string())?;
    println!("{}", table.layout());

    assert!(table.contains(&13));
    println!("Value: {:?}", table.get(&13));

    table.remove(&13)?;
    println!("Size after remove: {}", table.size());

    Ok(())
}
