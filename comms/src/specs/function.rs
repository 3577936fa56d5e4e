use std::fmt;

use serde::{Serialize, Serializer};

use super::QueryErr;

/// Identifier of one of the reference integrands.
///
/// Ids are contiguous and start at `0`, that is the value carried on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FuncId {
    Sine,
    Gaussian,
    ChargeDecay,
}

impl FuncId {
    /// Every registered integrand, ordered by id.
    pub const ALL: [FuncId; 3] = [FuncId::Sine, FuncId::Gaussian, FuncId::ChargeDecay];

    /// Returns the numeric id of this integrand.
    pub fn id(self) -> u64 {
        match self {
            FuncId::Sine => 0,
            FuncId::Gaussian => 1,
            FuncId::ChargeDecay => 2,
        }
    }
}

impl TryFrom<u64> for FuncId {
    type Error = QueryErr;

    fn try_from(id: u64) -> Result<Self, Self::Error> {
        FuncId::ALL
            .get(id as usize)
            .copied()
            .filter(|func| func.id() == id)
            .ok_or(QueryErr::UnknownFunction(id))
    }
}

impl fmt::Display for FuncId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

impl Serialize for FuncId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(self.id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_contiguous_from_zero() {
        for (idx, func) in FuncId::ALL.iter().enumerate() {
            assert_eq!(func.id(), idx as u64);
            assert_eq!(FuncId::try_from(idx as u64).unwrap(), *func);
        }
    }

    #[test]
    fn out_of_range_id_is_rejected() {
        assert_eq!(FuncId::try_from(3), Err(QueryErr::UnknownFunction(3)));
        assert_eq!(
            FuncId::try_from(u64::MAX),
            Err(QueryErr::UnknownFunction(u64::MAX))
        );
    }
}
