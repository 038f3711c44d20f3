// ABOUTME: Deterministic assignment of test suites to contiguous server groups.
// ABOUTME: Group i covers servers[i*n/k .. (i+1)*n/k].

/// Split `items` into `parts` contiguous, order-preserving groups.
///
/// Group sizes differ by at most one and the groups concatenate back to
/// `items`. When `parts > items.len()` some groups are empty. `parts == 0`
/// yields no groups.
pub fn split<T>(items: &[T], parts: usize) -> Vec<&[T]> {
    let len = items.len();
    (0..parts)
        .map(|i| &items[i * len / parts..(i + 1) * len / parts])
        .collect()
}

/// One suite and the servers it deploys to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestAssignment {
    pub suite: String,
    pub servers: Vec<String>,
}

/// Assignment of every listed suite to its server group, in suite order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestPlan {
    assignments: Vec<TestAssignment>,
    server_count: usize,
}

impl TestPlan {
    pub fn new(suites: Vec<String>, servers: &[String]) -> Self {
        let groups = split(servers, suites.len());
        let assignments = suites
            .into_iter()
            .zip(groups)
            .map(|(suite, group)| TestAssignment {
                suite,
                servers: group.to_vec(),
            })
            .collect();

        TestPlan {
            assignments,
            server_count: servers.len(),
        }
    }

    pub fn assignments(&self) -> &[TestAssignment] {
        &self.assignments
    }

    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    /// More suites than servers: some suites received an empty group.
    pub fn is_oversubscribed(&self) -> bool {
        self.assignments.len() > self.server_count
    }

    pub fn server_count(&self) -> usize {
        self.server_count
    }
}
