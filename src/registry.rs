use crate::model::Rgba;

/// One row of the crop reference table.
#[derive(Clone, Debug, PartialEq)]
pub struct CropEntry {
    pub name: String,
    pub avg_yield: f64,
    pub color: Rgba,
}

/// The crop reference table. Entries keep their insertion order so the
/// persisted `crop_index` stays meaningful; index 0 is always the
/// "no selection" sentinel.
pub struct CropRegistry {
    entries: Vec<CropEntry>,
}

impl CropRegistry {
    fn with_sentinel() -> Self {
        Self {
            entries: vec![CropEntry {
                name: "No selection".to_string(),
                avg_yield: 0.0,
                color: Rgba::opaque(120, 120, 120),
            }],
        }
    }

    /// Fallback table used when no crops file is available, so the app
    /// always starts with something to plant.
    pub fn default_table() -> Self {
        let mut registry = Self::with_sentinel();
        registry.add("Wheat", 3.2, Rgba::opaque(0xED, 0x91, 0x21));
        registry.add("Corn", 5.5, Rgba::opaque(0x10, 0xD0, 0x10));
        registry.add("Soybeans", 2.8, Rgba::opaque(0x3C, 0x8C, 0x3C));
        registry.add("Barley", 3.0, Rgba::opaque(0xC8, 0xB4, 0x50));
        registry.add("Potatoes", 20.0, Rgba::opaque(0xA0, 0x78, 0x46));
        registry
    }

    /// Loads `name,yield,red,green,blue` rows. A missing file or an empty
    /// table falls back to the built-in defaults; malformed rows are skipped.
    pub fn load_csv(path: &str) -> Self {
        match std::fs::read_to_string(path) {
            Ok(text) => Self::parse_csv(&text),
            Err(_) => Self::default_table(),
        }
    }

    pub fn parse_csv(text: &str) -> Self {
        let mut registry = Self::with_sentinel();
        for line in text.lines() {
            let fields: Vec<&str> = line.split(',').map(str::trim).collect();
            if fields.len() != 5 || fields[0].is_empty() {
                continue;
            }
            if fields[0].eq_ignore_ascii_case("name") {
                continue;
            }
            let Ok(avg_yield) = fields[1].parse::<f64>() else {
                continue;
            };
            let (Ok(r), Ok(g), Ok(b)) = (
                fields[2].parse::<u8>(),
                fields[3].parse::<u8>(),
                fields[4].parse::<u8>(),
            ) else {
                continue;
            };
            registry.add(fields[0], avg_yield, Rgba::opaque(r, g, b));
        }
        if registry.entries.len() == 1 {
            return Self::default_table();
        }
        registry
    }

    fn add(&mut self, name: &str, avg_yield: f64, color: Rgba) {
        if self.entries.iter().any(|e| e.name == name) {
            return;
        }
        self.entries.push(CropEntry {
            name: name.to_string(),
            avg_yield,
            color,
        });
    }

    pub fn entries(&self) -> &[CropEntry] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&CropEntry> {
        self.entries.get(index)
    }

    pub fn sentinel(&self) -> &CropEntry {
        &self.entries[0]
    }

    /// Unknown names yield `None`; callers treat that as "no crop selected".
    pub fn lookup(&self, name: &str) -> Option<&CropEntry> {
        if name.is_empty() {
            return None;
        }
        self.entries.iter().find(|e| e.name == name)
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rows_and_skips_junk() {
        let csv = "name,yield,red,green,blue\n\
                   Wheat,3.2,237,145,33\n\
                   not-enough-fields,1.0\n\
                   Rye,bad-yield,0,0,0\n\
                   Hops,1.8,90,160,60\n";
        let registry = CropRegistry::parse_csv(csv);
        assert_eq!(registry.entries().len(), 3);
        assert_eq!(registry.entries()[1].name, "Wheat");
        assert_eq!(registry.entries()[2].name, "Hops");
        assert_eq!(registry.lookup("Hops").unwrap().avg_yield, 1.8);
    }

    #[test]
    fn sentinel_is_index_zero() {
        let registry = CropRegistry::parse_csv("Wheat,3.2,237,145,33\n");
        assert_eq!(registry.index_of("No selection"), Some(0));
        assert_eq!(registry.sentinel().avg_yield, 0.0);
        assert_eq!(registry.index_of("Wheat"), Some(1));
    }

    #[test]
    fn unknown_crop_is_none() {
        let registry = CropRegistry::default_table();
        assert!(registry.lookup("Dragonfruit").is_none());
        assert!(registry.lookup("").is_none());
        assert!(registry.lookup("Wheat").is_some());
    }

    #[test]
    fn duplicate_names_keep_first_row() {
        let registry = CropRegistry::parse_csv("Wheat,3.2,1,2,3\nWheat,9.9,4,5,6\n");
        assert_eq!(registry.entries().len(), 2);
        assert_eq!(registry.lookup("Wheat").unwrap().avg_yield, 3.2);
    }

    #[test]
    fn empty_table_falls_back_to_defaults() {
        let registry = CropRegistry::parse_csv("name,yield,red,green,blue\n");
        assert!(registry.entries().len() > 1);
        assert!(registry.lookup("Wheat").is_some());
    }
}
