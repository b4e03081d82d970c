use crate::models::RawRecord;

/// One condition on a raw row.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Gas type equals the given value.
    GasType(String),
    /// Region (trimmed) is one of the listed values.
    RegionIn(Vec<String>),
    /// Industry equals the given value.
    Industry(String),
    /// Industry is one of the listed values.
    IndustryIn(Vec<String>),
}

impl Predicate {
    pub fn matches(&self, row: &RawRecord) -> bool {
        match self {
            Predicate::GasType(g) => row.gas_type == *g,
            Predicate::RegionIn(list) => {
                let region = row.region.trim();
                list.iter().any(|r| r == region)
            }
            Predicate::Industry(i) => row.industry == *i,
            Predicate::IndustryIn(list) => list.iter().any(|i| *i == row.industry),
        }
    }
}

/// A conjunction of predicates. The empty filter accepts every row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    predicates: Vec<Predicate>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn and(mut self, predicate: Predicate) -> Self {
        self.predicates.push(predicate);
        self
    }

    pub fn gas(self, gas: impl Into<String>) -> Self {
        self.and(Predicate::GasType(gas.into()))
    }

    pub fn regions<I, S>(self, regions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.and(Predicate::RegionIn(
            regions.into_iter().map(Into::into).collect(),
        ))
    }

    /// Restrict to one industry; `None` leaves the filter unchanged.
    pub fn industry(self, industry: Option<&str>) -> Self {
        match industry {
            Some(i) => self.and(Predicate::Industry(i.to_string())),
            None => self,
        }
    }

    pub fn industries<I, S>(self, industries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.and(Predicate::IndustryIn(
            industries.into_iter().map(Into::into).collect(),
        ))
    }

    pub fn predicates(&self) -> &[Predicate] {
        &self.predicates
    }

    pub fn matches(&self, row: &RawRecord) -> bool {
        self.predicates.iter().all(|p| p.matches(row))
    }
}

/// Rows accepted by `filter`, in input order.
pub fn filter_rows<'a>(rows: &'a [RawRecord], filter: &Filter) -> Vec<&'a RawRecord> {
    rows.iter().filter(|r| filter.matches(r)).collect()
}
