use crate::aggregate::{AssemblyTable, Counts};
use crate::error::{Result, RollupError};
use crate::graph::AssemblyGraph;
use std::collections::{HashMap, HashSet};

/// One assembly being expanded on the work stack
struct Expansion {
    name: String,
    subs: Vec<(String, u64)>,
    next: usize,
}

/// Memoized recursive part totals per assembly
///
/// `rollup(A)` is the direct parts of `A` plus, for each sub-assembly `S`
/// occurring `n` times, `n * rollup(S)`. Results are cached for the lifetime
/// of the engine; cached totals never include a caller's multiplier.
pub struct RollupEngine<'a> {
    table: &'a AssemblyTable,
    graph: AssemblyGraph,
    cache: HashMap<String, Counts>,
    hits: usize,
}

impl<'a> RollupEngine<'a> {
    pub fn new(table: &'a AssemblyTable) -> Self {
        Self {
            table,
            graph: AssemblyGraph::from_table(table),
            cache: HashMap::new(),
            hits: 0,
        }
    }

    pub fn graph(&self) -> &AssemblyGraph {
        &self.graph
    }

    /// Total count of every part reachable from `assembly`
    pub fn rollup(&mut self, assembly: &str) -> Result<&Counts> {
        if !self.table.is_assembly(assembly) {
            return Err(RollupError::UnknownAssembly(assembly.to_string()));
        }
        if !self.cache.contains_key(assembly) {
            self.expand(assembly)?;
        } else {
            self.hits += 1;
        }
        self.cache
            .get(assembly)
            .ok_or_else(|| RollupError::UnknownAssembly(assembly.to_string()))
    }

    /// Count of `part` in the full expansion of `assembly`, 0 when absent
    pub fn rollup_count(&mut self, assembly: &str, part: &str) -> Result<u64> {
        Ok(self.rollup(assembly)?.get(part).copied().unwrap_or(0))
    }

    /// Number of assemblies whose totals are cached
    pub fn cached(&self) -> usize {
        self.cache.len()
    }

    /// Depth-first expansion on an explicit stack
    ///
    /// Every assembly on the active path is tracked; meeting one again means
    /// the containment relation has a cycle.
    fn expand(&mut self, root: &str) -> Result<()> {
        let mut stack = vec![self.expansion(root)];
        let mut on_path: HashSet<String> = HashSet::from([root.to_string()]);

        while let Some(top) = stack.last_mut() {
            if top.next < top.subs.len() {
                let sub = top.subs[top.next].0.clone();
                top.next += 1;

                if self.cache.contains_key(&sub) {
                    self.hits += 1;
                    continue;
                }
                if on_path.contains(&sub) {
                    let start = stack.iter().position(|e| e.name == sub).unwrap_or(0);
                    let mut path: Vec<String> =
                        stack[start..].iter().map(|e| e.name.clone()).collect();
                    path.push(sub);
                    return Err(RollupError::CyclicReference { path });
                }

                on_path.insert(sub.clone());
                let next = self.expansion(&sub);
                stack.push(next);
                continue;
            }

            let Some(done) = stack.pop() else {
                break;
            };
            on_path.remove(&done.name);

            let totals = self.combine(&done)?;
            self.cache.insert(done.name, totals);
        }

        log::debug!(
            "Rolled up '{root}': {} assemblies cached, {} cache hits",
            self.cache.len(),
            self.hits
        );
        Ok(())
    }

    fn expansion(&self, name: &str) -> Expansion {
        Expansion {
            name: name.to_string(),
            subs: self
                .graph
                .subassemblies(name)
                .into_iter()
                .map(|(sub, n)| (sub.to_string(), n))
                .collect(),
            next: 0,
        }
    }

    /// Direct parts plus multiplied sub-assembly totals; all subs are cached
    fn combine(&self, expansion: &Expansion) -> Result<Counts> {
        let mut totals = self.table.direct_parts(&expansion.name);

        for (sub, n) in &expansion.subs {
            let Some(sub_totals) = self.cache.get(sub) else {
                continue;
            };
            for (part, count) in sub_totals {
                let overflow = || RollupError::CountOverflow {
                    assembly: expansion.name.clone(),
                    part: part.clone(),
                };
                let added = count.checked_mul(*n).ok_or_else(overflow)?;
                let slot = totals.entry(part.clone()).or_insert(0);
                *slot = slot.checked_add(added).ok_or_else(overflow)?;
            }
        }

        Ok(totals)
    }
}
