//! Read-only rendering of the directory and bucket arena.

use std::fmt;

use crate::directory::Directory;

/// Prints every directory slot, the global depth and each bucket's keys
///
/// ```text
/// Directory:
/// dir[0] = 0
/// dir[1] = 1
/// Global Depth: 1
/// Bucket 0 (Local Depth 1) : 2
/// Bucket 1 (Local Depth 1) : 5 13 21
/// ```
pub struct Layout<'a, K, V> {
    directory: &'a Directory<K, V>,
}

impl<'a, K, V> Layout<'a, K, V> {
    pub(crate) fn new(directory: &'a Directory<K, V>) -> Self {
        Self { directory }
    }
}

impl<K, V> fmt::Display for Layout<'_, K, V>
where
    K: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", DirectoryLayout::new(self.directory))?;
        writeln!(f, "Global Depth: {}", self.directory.global_depth())?;

        for (handle, bucket) in self.directory.buckets().iter().enumerate() {
            write!(
                f,
                "Bucket {} (Local Depth {}) :",
                handle,
                bucket.local_depth()
            )?;
            if bucket.is_empty() {
                writeln!(f, " Empty.")?;
                continue;
            }
            for (key, _) in bucket.iter() {
                write!(f, " {:?}", key)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Prints the directory slots only
pub struct DirectoryLayout<'a, K, V> {
    directory: &'a Directory<K, V>,
}

impl<'a, K, V> DirectoryLayout<'a, K, V> {
    pub(crate) fn new(directory: &'a Directory<K, V>) -> Self {
        Self { directory }
    }
}

impl<K, V> fmt::Display for DirectoryLayout<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Directory:")?;
        for (index, handle) in self.directory.slots().iter().enumerate() {
            writeln!(f, "dir[{}] = {}", index, handle)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::table::ExtendibleHashTable;

    #[test]
    fn test_layout_after_split() {
        let mut table = ExtendibleHashTable::new();
        for key in [5u64, 13, 21, 2] {
            table.insert(key, ()).unwrap();
        }

        let expected = "\
Directory:
dir[0] = 0
dir[1] = 1
Global Depth: 1
Bucket 0 (Local Depth 1) : 2
Bucket 1 (Local Depth 1) : 5 13 21
";
        assert_eq!(table.layout().to_string(), expected);
    }

    #[test]
    fn test_layout_empty_table() {
        let table: ExtendibleHashTable<u64, ()> = ExtendibleHashTable::new();
        let expected = "\
Directory:
dir[0] = 0
Global Depth: 0
Bucket 0 (Local Depth 0) : Empty.
";
        assert_eq!(table.layout().to_string(), expected);
    }

    #[test]
    fn test_directory_layout_shows_aliases() {
        let mut table = ExtendibleHashTable::new();
        for key in [1u64, 3, 5, 7] {
            table.insert(key, ()).unwrap();
        }

        let rendered = table.directory_layout().to_string();
        assert!(rendered.starts_with("Directory:\n"));
        assert_eq!(rendered.lines().count(), 1 + (1 << table.global_depth()));
    }
}
