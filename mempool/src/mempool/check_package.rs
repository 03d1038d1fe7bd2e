//! Structural checks of a package, performed before any contextual validation.
//!
//! All the functions of this module are pure over the transactions sequence.

use super::{
    config::Config,
    errors::{PackageRuleError, PackageRuleResult},
};
use crate::model::package::PackageTopology;
use std::collections::{HashMap, HashSet};
use txpool_consensus_core::{
    mass::transaction_virtual_size,
    tx::{Transaction, TransactionId, TransactionOutpoint},
};

/// Checks the structure of a package and returns its topology.
///
/// Rules are evaluated in this order, the first failing one being reported:
///
/// 1. the transaction count is at most `config.maximum_package_count`,
/// 2. for more than one transaction, the total virtual size is at most `config.maximum_package_virtual_size`,
/// 3. a single transaction is a [`PackageTopology::SingleTx`],
/// 4. no transaction appears twice,
/// 5. every transaction appears before all the transactions spending it,
/// 6. no two transactions spend the same outpoint,
/// 7. the last transaction is a child spending every other transaction.
///
/// An empty package is not a child with parents.
pub fn check_package<T: AsRef<Transaction>>(transactions: &[T], config: &Config) -> PackageRuleResult<PackageTopology> {
    if transactions.len() > config.maximum_package_count {
        return Err(PackageRuleError::TooManyTransactions(transactions.len(), config.maximum_package_count));
    }

    if transactions.len() > 1 {
        let total_virtual_size =
            transactions.iter().map(|tx| transaction_virtual_size(tx.as_ref(), 0, config.bytes_per_sigop)).sum::<u64>();
        if total_virtual_size > config.maximum_package_virtual_size {
            return Err(PackageRuleError::TooLarge(total_virtual_size, config.maximum_package_virtual_size));
        }
    }

    if transactions.len() == 1 {
        return Ok(PackageTopology::SingleTx);
    }

    if transactions.is_empty() {
        return Err(PackageRuleError::NotChildWithParents);
    }

    check_no_duplicates(transactions)?;
    check_topo_sorted(transactions)?;
    check_consistent(transactions)?;
    match is_child_with_parents(transactions) {
        true => Ok(PackageTopology::ChildWithParents),
        false => Err(PackageRuleError::NotChildWithParents),
    }
}

fn check_no_duplicates<T: AsRef<Transaction>>(transactions: &[T]) -> PackageRuleResult<()> {
    let mut ids = HashSet::with_capacity(transactions.len());
    for tx in transactions.iter().map(AsRef::as_ref) {
        if !ids.insert(tx.id()) {
            return Err(PackageRuleError::ContainsDuplicates(tx.id()));
        }
    }
    Ok(())
}

fn check_topo_sorted<T: AsRef<Transaction>>(transactions: &[T]) -> PackageRuleResult<()> {
    let positions: HashMap<TransactionId, usize> =
        transactions.iter().enumerate().map(|(i, tx)| (tx.as_ref().id(), i)).collect();
    for (i, tx) in transactions.iter().map(AsRef::as_ref).enumerate() {
        for input in tx.inputs.iter() {
            if let Some(&parent_position) = positions.get(&input.previous_outpoint.transaction_id) {
                if parent_position > i {
                    return Err(PackageRuleError::NotSorted(tx.id(), input.previous_outpoint.transaction_id));
                }
            }
        }
    }
    Ok(())
}

fn check_consistent<T: AsRef<Transaction>>(transactions: &[T]) -> PackageRuleResult<()> {
    let mut spenders: HashMap<TransactionOutpoint, TransactionId> = HashMap::new();
    for tx in transactions.iter().map(AsRef::as_ref) {
        for input in tx.inputs.iter() {
            if let Some(previous_spender) = spenders.insert(input.previous_outpoint, tx.id()) {
                return Err(PackageRuleError::ConflictInPackage(previous_spender, tx.id(), input.previous_outpoint));
            }
        }
    }
    Ok(())
}

/// Whether every transaction appears before all the package transactions spending it
pub fn is_topo_sorted_package<T: AsRef<Transaction>>(transactions: &[T]) -> bool {
    check_topo_sorted(transactions).is_ok()
}

/// Whether no two transactions of the package spend the same outpoint
pub fn is_consistent_package<T: AsRef<Transaction>>(transactions: &[T]) -> bool {
    check_consistent(transactions).is_ok()
}

/// Whether the package is made of at least 2 transactions, the last one being a child
/// spending an output of every other one
pub fn is_child_with_parents<T: AsRef<Transaction>>(transactions: &[T]) -> bool {
    let Some((child, parents)) = transactions.split_last() else {
        return false;
    };
    if parents.is_empty() {
        return false;
    }
    let spent_ids: HashSet<TransactionId> = child.as_ref().inputs.iter().map(|x| x.previous_outpoint.transaction_id).collect();
    parents.iter().all(|parent| spent_ids.contains(&parent.as_ref().id()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutils::tx_helpers::{create_transaction, funding_transaction, placeholder_transaction, spend};
    use itertools::Itertools;
    use std::sync::Arc;
    use txpool_consensus_core::constants::SEQUENCE_FINAL;

    /// Builds `parent_count` independent parents and a child spending all of them
    fn child_with_parents(parent_count: usize, seed: u64) -> Vec<Transaction> {
        let mut package = (0..parent_count)
            .map(|i| create_transaction(vec![spend(&funding_transaction(seed + i as u64), 0, SEQUENCE_FINAL)], &[10_000]))
            .collect_vec();
        let child = create_transaction(package.iter().map(|parent| spend(parent, 0, SEQUENCE_FINAL)).collect(), &[5_000]);
        package.push(child);
        package
    }

    #[test]
    fn test_package_count_and_size_limits() {
        let config = Config::default();

        // Too many transactions, whatever their shape
        let too_many = (0..config.maximum_package_count + 1).map(|_| placeholder_transaction()).collect_vec();
        assert_eq!(check_package(&too_many, &config), Err(PackageRuleError::TooManyTransactions(26, 25)));

        // Exactly the maximum count is fine
        let max_count = child_with_parents(config.maximum_package_count - 1, 100);
        assert_eq!(check_package(&max_count, &config), Ok(PackageTopology::ChildWithParents));

        // Too large as a whole
        let large = (0..3u64)
            .map(|i| {
                let mut tx = create_transaction(vec![spend(&funding_transaction(200 + i), 0, SEQUENCE_FINAL)], &[10_000]);
                tx.inputs[0].witness = vec![vec![0; 150_000]];
                tx.finalize();
                tx
            })
            .collect_vec();
        let total = large.iter().map(|tx| transaction_virtual_size(tx, 0, config.bytes_per_sigop)).sum::<u64>();
        assert!(total > config.maximum_package_virtual_size);
        assert_eq!(check_package(&large, &config), Err(PackageRuleError::TooLarge(total, config.maximum_package_virtual_size)));

        // A single large transaction is a structurally valid package
        assert_eq!(check_package(&large[..1], &config), Ok(PackageTopology::SingleTx));
    }

    #[test]
    fn test_package_topology() {
        let config = Config::default();

        let package = child_with_parents(2, 300);
        assert_eq!(check_package(&package, &config), Ok(PackageTopology::ChildWithParents));
        assert!(is_child_with_parents(&package));
        assert!(is_topo_sorted_package(&package));
        assert!(is_consistent_package(&package));

        // The package also checks through shared references
        let shared = package.iter().cloned().map(Arc::new).collect_vec();
        assert_eq!(check_package(&shared, &config), Ok(PackageTopology::ChildWithParents));

        // Unsorted: the child comes before one of its parents
        let unsorted = vec![package[0].clone(), package[2].clone(), package[1].clone()];
        assert_eq!(check_package(&unsorted, &config), Err(PackageRuleError::NotSorted(package[2].id(), package[1].id())));
        assert!(!is_topo_sorted_package(&unsorted));

        // An unrelated transaction
        let mut unrelated = package.clone();
        unrelated.insert(0, placeholder_transaction());
        assert_eq!(check_package(&unrelated, &config), Err(PackageRuleError::NotChildWithParents));

        // Three generations: the grandparent is not spent by the child
        let grandparent = create_transaction(vec![spend(&funding_transaction(400), 0, SEQUENCE_FINAL)], &[10_000]);
        let parent = create_transaction(vec![spend(&grandparent, 0, SEQUENCE_FINAL)], &[9_000]);
        let child = create_transaction(vec![spend(&parent, 0, SEQUENCE_FINAL)], &[8_000]);
        let generations = vec![grandparent.clone(), parent.clone(), child];
        assert!(is_topo_sorted_package(&generations));
        assert_eq!(check_package(&generations, &config), Err(PackageRuleError::NotChildWithParents));

        // A lone parent with its child is fine, but the reversed pair is not sorted
        assert_eq!(check_package(&generations[..2], &config), Ok(PackageTopology::ChildWithParents));
        assert_eq!(
            check_package(&[parent.clone(), grandparent.clone()], &config),
            Err(PackageRuleError::NotSorted(parent.id(), grandparent.id()))
        );

        // Two parents, one of them also spending the other
        let first_parent = create_transaction(vec![spend(&funding_transaction(450), 0, SEQUENCE_FINAL)], &[4_000, 5_000]);
        let second_parent = create_transaction(vec![spend(&first_parent, 1, SEQUENCE_FINAL)], &[4_000]);
        let child = create_transaction(
            vec![spend(&first_parent, 0, SEQUENCE_FINAL), spend(&second_parent, 0, SEQUENCE_FINAL)],
            &[7_000],
        );
        let sorted = vec![first_parent.clone(), second_parent.clone(), child.clone()];
        assert_eq!(check_package(&sorted, &config), Ok(PackageTopology::ChildWithParents));
        let unsorted = vec![second_parent.clone(), first_parent.clone(), child];
        assert_eq!(check_package(&unsorted, &config), Err(PackageRuleError::NotSorted(second_parent.id(), first_parent.id())));

        // Empty package
        assert_eq!(check_package::<Transaction>(&[], &config), Err(PackageRuleError::NotChildWithParents));
        assert!(!is_child_with_parents::<Transaction>(&[]));
    }

    #[test]
    fn test_package_duplicates_and_conflicts() {
        let config = Config::default();
        let package = child_with_parents(2, 500);

        let duplicated = vec![package[0].clone(), package[0].clone(), package[2].clone()];
        assert_eq!(check_package(&duplicated, &config), Err(PackageRuleError::ContainsDuplicates(package[0].id())));

        // Two parents spending the same funding outpoint
        let funding = funding_transaction(600);
        let parent_a = create_transaction(vec![spend(&funding, 0, SEQUENCE_FINAL)], &[10_000]);
        let parent_b = create_transaction(vec![spend(&funding, 0, SEQUENCE_FINAL)], &[9_000]);
        let child = create_transaction(vec![spend(&parent_a, 0, SEQUENCE_FINAL), spend(&parent_b, 0, SEQUENCE_FINAL)], &[5_000]);
        let conflicting = vec![parent_a.clone(), parent_b.clone(), child];
        assert!(!is_consistent_package(&conflicting));
        assert_eq!(
            check_package(&conflicting, &config),
            Err(PackageRuleError::ConflictInPackage(parent_a.id(), parent_b.id(), parent_a.inputs[0].previous_outpoint))
        );
    }
}
