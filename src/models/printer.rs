use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Identifier of a single printer: class name followed by a 1-based index ("A7").
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PrinterId {
    pub class: String,
    pub index: u32,
}

impl PrinterId {
    pub fn new(class: impl Into<String>, index: u32) -> Self {
        Self {
            class: class.into(),
            index,
        }
    }
}

impl fmt::Display for PrinterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.class, self.index)
    }
}

impl FromStr for PrinterId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let split = s
            .find(|c: char| c.is_ascii_digit())
            .ok_or_else(|| format!("Printer id '{}' has no index", s))?;
        let (class, index) = s.split_at(split);

        if class.is_empty() || !class.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(format!("Printer id '{}' has an invalid class", s));
        }

        let index = index
            .parse::<u32>()
            .map_err(|_| format!("Printer id '{}' has an invalid index", s))?;
        if index == 0 {
            return Err(format!("Printer id '{}' has an invalid index", s));
        }

        Ok(PrinterId::new(class, index))
    }
}

impl TryFrom<String> for PrinterId {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<PrinterId> for String {
    fn from(id: PrinterId) -> Self {
        id.to_string()
    }
}

/// A named group of interchangeable printers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrinterClass {
    pub name: String,
    pub capacity: u32,
}

impl PrinterClass {
    pub fn new(name: impl Into<String>, capacity: u32) -> Self {
        Self {
            name: name.into(),
            capacity,
        }
    }
}

/// Static catalog of the workshop's printers.
///
/// Canonical order is class declaration order, then ascending index within a
/// class. Every listing and every render ordering goes through that order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrinterPool {
    classes: Vec<PrinterClass>,
}

impl Default for PrinterPool {
    fn default() -> Self {
        Self::new(vec![PrinterClass::new("A", 10), PrinterClass::new("B", 6)])
    }
}

impl PrinterPool {
    pub fn new(classes: Vec<PrinterClass>) -> Self {
        Self { classes }
    }

    pub fn has_class(&self, name: &str) -> bool {
        self.classes.iter().any(|class| class.name == name)
    }

    /// Lists printers in canonical order, optionally restricted to one class.
    /// Unknown classes yield an empty list.
    pub fn list_printers(&self, class: Option<&str>) -> Vec<PrinterId> {
        self.classes
            .iter()
            .filter(|c| class.map_or(true, |name| c.name == name))
            .flat_map(|c| (1..=c.capacity).map(move |index| PrinterId::new(c.name.clone(), index)))
            .collect()
    }

    pub fn is_valid_printer(&self, id: &str) -> bool {
        id.parse::<PrinterId>()
            .map(|printer| self.contains(&printer))
            .unwrap_or(false)
    }

    pub fn contains(&self, printer: &PrinterId) -> bool {
        self.classes
            .iter()
            .any(|c| c.name == printer.class && printer.index >= 1 && printer.index <= c.capacity)
    }

    /// Rank of a printer in canonical order, `None` when it is not part of the pool.
    pub fn position(&self, printer: &PrinterId) -> Option<usize> {
        let mut offset = 0usize;
        for class in &self.classes {
            if class.name == printer.class {
                if printer.index >= 1 && printer.index <= class.capacity {
                    return Some(offset + printer.index as usize - 1);
                }
                return None;
            }
            offset += class.capacity as usize;
        }
        None
    }

    pub fn len(&self) -> usize {
        self.classes.iter().map(|c| c.capacity as usize).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_printer_id() {
        let id: PrinterId = "A7".parse().unwrap();
        assert_eq!(id, PrinterId::new("A", 7));
        assert_eq!(id.to_string(), "A7");

        assert!("A".parse::<PrinterId>().is_err());
        assert!("7".parse::<PrinterId>().is_err());
        assert!("A0".parse::<PrinterId>().is_err());
        assert!("A-1".parse::<PrinterId>().is_err());
    }

    #[test]
    fn test_default_pool_layout() {
        let pool = PrinterPool::default();
        assert_eq!(pool.len(), 16);

        let class_a = pool.list_printers(Some("A"));
        assert_eq!(class_a.len(), 10);
        assert_eq!(class_a.first().unwrap().to_string(), "A1");
        assert_eq!(class_a.last().unwrap().to_string(), "A10");

        let all: Vec<String> = pool.list_printers(None).iter().map(|p| p.to_string()).collect();
        assert_eq!(all[9], "A10");
        assert_eq!(all[10], "B1");
        assert_eq!(all.len(), 16);
    }

    #[test]
    fn test_unknown_class_lists_nothing() {
        let pool = PrinterPool::default();
        assert!(pool.list_printers(Some("C")).is_empty());
        assert!(!pool.has_class("C"));
    }

    #[test]
    fn test_is_valid_printer() {
        let pool = PrinterPool::default();
        assert!(pool.is_valid_printer("A1"));
        assert!(pool.is_valid_printer("A10"));
        assert!(pool.is_valid_printer("B6"));
        assert!(!pool.is_valid_printer("B7"));
        assert!(!pool.is_valid_printer("C1"));
        assert!(!pool.is_valid_printer(""));
    }

    #[test]
    fn test_position_follows_canonical_order() {
        let pool = PrinterPool::default();
        assert_eq!(pool.position(&PrinterId::new("A", 1)), Some(0));
        assert_eq!(pool.position(&PrinterId::new("A", 10)), Some(9));
        assert_eq!(pool.position(&PrinterId::new("B", 1)), Some(10));
        assert_eq!(pool.position(&PrinterId::new("B", 7)), None);
    }
}
