//! Genealogy records: streaming dot output during a run, and an offline
//! ancestry graph rebuilt from saved snapshots.

use crate::error::{IoError, Result};
use crate::snapshot::PopulationSnapshot;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::Bfs;
use plastica_core::Population;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt::Write as _;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

const HEADER: &str = "digraph genealogy {";
const FOOTER: &str = "}";

fn node_name(generation: usize, id: usize) -> String {
    format!("\"{}:{}\"", generation, id)
}

fn edge_line(generation: usize, id: usize, parents: &[usize]) -> String {
    let targets: Vec<String> = parents
        .iter()
        .map(|&p| node_name(generation.saturating_sub(1), p))
        .collect();
    format!("  {} -> {{{}}};", node_name(generation, id), targets.join(" "))
}

/// Appends `child -> {father mother}` lines for each recorded generation.
pub struct GenealogyWriter<W: Write> {
    out: W,
}

impl<W: Write> GenealogyWriter<W> {
    pub fn new(mut out: W) -> Result<Self> {
        writeln!(out, "{}", HEADER)?;
        Ok(Self { out })
    }

    /// Writes one edge line per individual that has parents.
    pub fn record(&mut self, population: &Population) -> Result<()> {
        for individual in &population.individuals {
            if let (Some(father), Some(mother)) = (individual.father, individual.mother) {
                writeln!(
                    self.out,
                    "{}",
                    edge_line(population.generation, individual.id, &[father, mother])
                )?;
            }
        }
        Ok(())
    }

    /// Writes the footer and returns the sink.
    pub fn finish(mut self) -> Result<W> {
        writeln!(self.out, "{}", FOOTER)?;
        self.out.flush()?;
        Ok(self.out)
    }
}

impl GenealogyWriter<BufWriter<File>> {
    /// Reopens a graph closed by an earlier run so that further generations
    /// extend it. A missing or empty file starts a new graph.
    pub fn reopen<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let previous = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
            Err(e) => {
                return Err(IoError::FileSystem(e).with_context(format!("reading genealogy {:?}", path)))
            }
        };
        let body = if previous.trim().is_empty() {
            None
        } else {
            let body = previous.trim_end().strip_suffix(FOOTER).ok_or_else(|| {
                IoError::validation(format!("{:?} is not a closed genealogy graph", path))
            })?;
            Some(body.to_string())
        };

        let file = File::create(path).map_err(|e| {
            IoError::FileSystem(e).with_context(format!("creating genealogy {:?}", path))
        })?;
        let mut out = BufWriter::new(file);
        match body {
            Some(body) => {
                out.write_all(body.as_bytes())?;
                Ok(Self { out })
            }
            None => Self::new(out),
        }
    }
}

/// One individual in one generation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Member {
    pub generation: usize,
    pub id: usize,
}

/// Ancestry graph with edges from child to parent.
pub struct Genealogy {
    pub graph: DiGraph<Member, ()>,
    index: HashMap<Member, NodeIndex>,
}

impl Genealogy {
    /// Builds the graph from populations in generation order. A parent link
    /// is kept only when the parent's generation is present.
    pub fn from_populations<'a, I>(populations: I) -> Self
    where
        I: IntoIterator<Item = &'a Population>,
    {
        let mut graph = DiGraph::new();
        let mut index: HashMap<Member, NodeIndex> = HashMap::new();
        for population in populations {
            let generation = population.generation;
            for individual in &population.individuals {
                let member = Member {
                    generation,
                    id: individual.id,
                };
                if index.contains_key(&member) {
                    continue;
                }
                let node = graph.add_node(member);
                index.insert(member, node);
                if generation == 0 {
                    continue;
                }
                let mut parents: Vec<usize> =
                    individual.father.into_iter().chain(individual.mother).collect();
                parents.dedup();
                for id in parents {
                    let parent = Member {
                        generation: generation - 1,
                        id,
                    };
                    if let Some(&p) = index.get(&parent) {
                        graph.add_edge(node, p, ());
                    }
                }
            }
        }
        Self { graph, index }
    }

    /// Reads snapshots in the given order and builds the graph from them.
    pub fn from_snapshots<P: AsRef<Path>>(paths: &[P]) -> Result<Self> {
        let mut populations = Vec::with_capacity(paths.len());
        for path in paths {
            populations.push(PopulationSnapshot::read(path)?.population);
        }
        populations.sort_by_key(|p| p.generation);
        tracing::info!(snapshots = populations.len(), "Building genealogy");
        Ok(Self::from_populations(&populations))
    }

    #[must_use]
    pub fn node(&self, generation: usize, id: usize) -> Option<NodeIndex> {
        self.index.get(&Member { generation, id }).copied()
    }

    #[must_use]
    pub fn final_generation(&self) -> Option<usize> {
        self.graph.node_weights().map(|m| m.generation).max()
    }

    /// Members of the final generation and everyone they descend from.
    #[must_use]
    pub fn ancestors(&self) -> HashSet<NodeIndex> {
        let mut seen = HashSet::new();
        let Some(last) = self.final_generation() else {
            return seen;
        };
        for start in self.graph.node_indices() {
            if self.graph[start].generation != last || seen.contains(&start) {
                continue;
            }
            let mut bfs = Bfs::new(&self.graph, start);
            while let Some(node) = bfs.next(&self.graph) {
                seen.insert(node);
            }
        }
        seen
    }

    /// `(generation, ancestors)` per generation, earliest first; the final
    /// generation counts its own members.
    #[must_use]
    pub fn ancestor_counts(&self) -> Vec<(usize, usize)> {
        let mut counts: BTreeMap<usize, usize> = BTreeMap::new();
        for member in self.graph.node_weights() {
            counts.entry(member.generation).or_insert(0);
        }
        for node in self.ancestors() {
            *counts.entry(self.graph[node].generation).or_insert(0) += 1;
        }
        counts.into_iter().collect()
    }

    /// Dot graph of the whole genealogy, or only of the final generation's
    /// ancestry.
    #[must_use]
    pub fn to_dot(&self, only_ancestors: bool) -> String {
        let keep = only_ancestors.then(|| self.ancestors());
        let mut dot = String::new();
        let _ = writeln!(dot, "{}", HEADER);
        for node in self.graph.node_indices() {
            if keep.as_ref().is_some_and(|k| !k.contains(&node)) {
                continue;
            }
            let member = self.graph[node];
            let mut parents: Vec<usize> = self
                .graph
                .neighbors(node)
                .map(|p| self.graph[p].id)
                .collect();
            parents.sort_unstable();
            if parents.is_empty() {
                let _ = writeln!(dot, "  {};", node_name(member.generation, member.id));
            } else {
                let _ = writeln!(dot, "{}", edge_line(member.generation, member.id, &parents));
            }
        }
        let _ = writeln!(dot, "{}", FOOTER);
        dot
    }

    /// Ancestor counts as a `generation\tancestors` table.
    #[must_use]
    pub fn counts_tsv(&self) -> String {
        let mut out = String::from("generation\tancestors\n");
        for (generation, count) in self.ancestor_counts() {
            let _ = writeln!(out, "{}\t{}", generation, count);
        }
        out
    }
}
