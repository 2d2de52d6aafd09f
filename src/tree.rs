use crate::process::{Pid, ProcessRecord};
use crate::repository::ProcessRepository;

/// Parent/child links over the records of a [`ProcessRepository`].
///
/// Nodes are arena slots of the repository; the forest never copies a record.
#[derive(Debug)]
pub struct ProcessForest<'a> {
    repository: &'a ProcessRepository,
    roots: Vec<usize>,
    /// Children of each arena slot, indexed by slot
    children: Vec<Vec<usize>>,
}

impl<'a> ProcessForest<'a> {
    /// Link every record to its declared parent.
    ///
    /// A record becomes a root when its parent was not collected or when it declares itself as
    /// its own parent. Parent chains are only ever followed one hop, so cycles cannot make this
    /// loop. Roots and children are sorted by pid so that the output does not depend on the
    /// collection order.
    pub fn build(repository: &'a ProcessRepository) -> Self {
        let mut roots = Vec::new();
        let mut children = vec![Vec::new(); repository.count()];

        for (slot, record) in repository.all().enumerate() {
            let parent_slot = record
                .parent_pid
                .and_then(|parent_pid| repository.slot(parent_pid))
                .filter(|&parent_slot| parent_slot != slot);

            match parent_slot {
                Some(parent_slot) => children[parent_slot].push(slot),
                None => roots.push(slot),
            }
        }

        let pid_of = |slot: &usize| repository.record(*slot).pid;
        roots.sort_by_key(pid_of);
        for siblings in &mut children {
            siblings.sort_by_key(pid_of);
        }

        Self {
            repository,
            roots,
            children,
        }
    }

    pub fn repository(&self) -> &'a ProcessRepository {
        self.repository
    }

    pub fn roots(&self) -> &[usize] {
        &self.roots
    }

    pub fn children(&self, slot: usize) -> &[usize] {
        &self.children[slot]
    }

    pub fn record(&self, slot: usize) -> &'a ProcessRecord {
        self.repository.record(slot)
    }

    pub fn slot_of(&self, pid: Pid) -> Option<usize> {
        self.repository.slot(pid)
    }

    pub fn root_pids(&self) -> Vec<Pid> {
        self.roots.iter().map(|&slot| self.record(slot).pid).collect()
    }

    pub fn child_pids(&self, pid: Pid) -> Vec<Pid> {
        self.slot_of(pid)
            .map(|slot| {
                self.children(slot)
                    .iter()
                    .map(|&child| self.record(child).pid)
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use itertools::Itertools;

    fn repository(entries: &[(Pid, Option<Pid>, &str)]) -> ProcessRepository {
        entries
            .iter()
            .map(|&(pid, parent_pid, name)| ProcessRecord::new(pid, parent_pid, name))
            .collect()
    }

    #[test]
    fn test_build_links_children_and_roots() {
        let repository = repository(&[
            (3, Some(2), "editor"),
            (4, Some(0), "daemon"),
            (2, Some(1), "shell"),
            (1, Some(0), "init"),
        ]);
        let forest = ProcessForest::build(&repository);

        assert_eq!(forest.root_pids(), vec![1, 4]);
        assert_eq!(forest.child_pids(1), vec![2]);
        assert_eq!(forest.child_pids(2), vec![3]);
        assert!(forest.child_pids(3).is_empty());
        assert!(forest.child_pids(4).is_empty());
    }

    #[test]
    fn test_children_sorted_by_pid_regardless_of_insertion_order() {
        let repository = repository(&[
            (1, None, "init"),
            (90, Some(1), "c"),
            (12, Some(1), "a"),
            (55, Some(1), "b"),
            (70, None, "orphan"),
            (30, Some(999), "lost"),
        ]);
        let forest = ProcessForest::build(&repository);

        assert_eq!(forest.child_pids(1), vec![12, 55, 90]);
        assert_eq!(forest.root_pids(), vec![1, 30, 70]);
    }

    #[test]
    fn test_self_parent_is_a_root() {
        let repository = repository(&[(5, Some(5), "loner"), (6, Some(5), "child")]);
        let forest = ProcessForest::build(&repository);

        assert_eq!(forest.root_pids(), vec![5]);
        assert_eq!(forest.child_pids(5), vec![6]);
    }

    #[test]
    fn test_missing_parent_is_a_root() {
        let repository = repository(&[(10, None, "absent"), (11, Some(0), "zero")]);
        let forest = ProcessForest::build(&repository);

        assert_eq!(forest.root_pids(), vec![10, 11]);
    }

    #[test]
    fn test_two_node_cycle_terminates_without_roots() {
        let repository = repository(&[(1, Some(2), "a"), (2, Some(1), "b")]);
        let forest = ProcessForest::build(&repository);

        assert!(forest.roots().is_empty());
        assert_eq!(forest.child_pids(1), vec![2]);
        assert_eq!(forest.child_pids(2), vec![1]);
    }

    #[test]
    fn test_every_record_placed_exactly_once() {
        let repository: ProcessRepository = (1..200u32)
            .map(|pid| {
                // Mix of valid parents, missing parents and self parents
                let parent = match pid % 7 {
                    0 => Some(pid),
                    1 => None,
                    2 => Some(pid + 1000),
                    _ => Some(pid / 3),
                };
                ProcessRecord::new(pid, parent, format!("p{pid}"))
            })
            .collect();
        let forest = ProcessForest::build(&repository);

        let placed = forest
            .roots()
            .iter()
            .chain((0..repository.count()).flat_map(|slot| forest.children(slot)))
            .map(|&slot| forest.record(slot).pid)
            .sorted()
            .collect_vec();
        let expected = repository.all().map(|record| record.pid).sorted().collect_vec();
        assert_eq!(placed, expected);

        let is_sorted = |pids: &[usize]| {
            pids.iter()
                .map(|&slot| forest.record(slot).pid)
                .tuple_windows()
                .all(|(a, b)| a <= b)
        };
        assert!(is_sorted(forest.roots()));
        assert!((0..repository.count()).all(|slot| is_sorted(forest.children(slot))));
    }
}
