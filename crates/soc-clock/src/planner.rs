//! Clock domain planner.
//!
//! Turns a board's input clocks and an ordered list of domain requests into
//! a [`ClockPlan`]. The primary input drives stage 0; any other input must be
//! declared as its own stage before domains may be rooted at it.

use std::collections::BTreeMap;

use soc_board::{Board, InputClock};
use tracing::{debug, warn};

use crate::error::{ClockError, Result};
use crate::plan::{ClockDomain, ClockPlan, GenerationStage};
use crate::request::{ClockRequest, ClockSource, DomainRole, Frequency, SYS_DOMAIN};
use crate::reset::ResetLine;
use crate::solve::{first_unsolvable, solve_stage, DEFAULT_MARGIN};

/// Builder for a [`ClockPlan`].
#[derive(Debug, Clone)]
pub struct ClockPlanner<'a> {
    board: &'a Board,
    declared: Vec<String>,
    requests: Vec<ClockRequest>,
    margin: f64,
}

/// A request that survived name merging, with its frequency resolved.
struct Draft<'r> {
    request: &'r ClockRequest,
    hz: u64,
}

/// Plan clocks for `requests` on the board's primary stage.
pub fn plan_clocks(board: &Board, requests: &[ClockRequest]) -> Result<ClockPlan> {
    ClockPlanner::new(board)
        .requests(requests.iter().cloned())
        .build()
}

impl<'a> ClockPlanner<'a> {
    pub fn new(board: &'a Board) -> Self {
        Self {
            board,
            declared: Vec::new(),
            requests: Vec::new(),
            margin: DEFAULT_MARGIN,
        }
    }

    /// Relative frequency tolerance per output.
    pub fn with_margin(mut self, margin: f64) -> Self {
        self.margin = margin;
        self
    }

    /// Allow `input` to drive its own generation stage.
    pub fn declare_stage(mut self, input: impl Into<String>) -> Self {
        self.declared.push(input.into());
        self
    }

    pub fn request(mut self, request: ClockRequest) -> Self {
        self.requests.push(request);
        self
    }

    pub fn requests(mut self, requests: impl IntoIterator<Item = ClockRequest>) -> Self {
        self.requests.extend(requests);
        self
    }

    /// Build the plan.
    pub fn build(&self) -> Result<ClockPlan> {
        let stage_inputs = self.stage_inputs()?;
        let sys_hz = self.sys_hz()?;

        let (drafts, by_name) = self.merge_by_name(sys_hz)?;

        let mut stages = Vec::with_capacity(drafts.len());
        for index in 0..drafts.len() {
            let stage = self.stage_of(index, &drafts, &by_name, &stage_inputs)?;
            if drafts[index].request.role == DomainRole::Calibration && stage != 0 {
                return Err(ClockError::InvalidRequest {
                    domain: drafts[index].request.name.clone(),
                    detail: "calibration domains are generated by the primary stage".into(),
                });
            }
            stages.push(stage);
        }

        let mut phases = Vec::with_capacity(drafts.len());
        for index in 0..drafts.len() {
            let mut visited = vec![index];
            phases.push(absolute_phase(index, &drafts, &by_name, &stages, &mut visited)?);
        }

        // De-duplicate identical (stage, frequency, phase, role) into one domain.
        let mut underlying: Vec<usize> = Vec::new();
        let mut aliases = BTreeMap::new();
        for index in 0..drafts.len() {
            let same = underlying.iter().copied().find(|&u| {
                stages[u] == stages[index]
                    && drafts[u].hz == drafts[index].hz
                    && phases[u].to_bits() == phases[index].to_bits()
                    && drafts[u].request.role == drafts[index].request.role
            });
            match same {
                Some(u) => {
                    debug!(
                        alias = %drafts[index].request.name,
                        domain = %drafts[u].request.name,
                        "merged identical clock domain"
                    );
                    aliases.insert(
                        drafts[index].request.name.clone(),
                        drafts[u].request.name.clone(),
                    );
                }
                None => underlying.push(index),
            }
        }

        // Drop declared stages that ended up without outputs.
        let mut used: Vec<usize> = underlying.iter().map(|&u| stages[u]).collect();
        used.sort_unstable();
        used.dedup();
        for (index, input) in stage_inputs.iter().enumerate() {
            if !used.contains(&index) && index != 0 {
                warn!(input = %input.name, "declared clock stage has no domains; dropping it");
            }
        }

        let generator = self.board.generator;
        let limits = generator.limits();
        let mut plan_stages = Vec::with_capacity(used.len());
        let mut domains: Vec<ClockDomain> = Vec::with_capacity(underlying.len());

        for (new_index, &old_index) in used.iter().enumerate() {
            let input = stage_inputs[old_index];
            let members: Vec<usize> = underlying
                .iter()
                .copied()
                .filter(|&u| stages[u] == old_index)
                .collect();
            let targets: Vec<u64> = members.iter().map(|&u| drafts[u].hz).collect();

            for &u in &members {
                if phases[u] != 0.0 && !generator.supports_phase() {
                    return Err(ClockError::UnachievableFrequency {
                        domain: drafts[u].request.name.clone(),
                        freq_hz: drafts[u].hz,
                        detail: format!("{:?} generators cannot shift phase", generator.family),
                    });
                }
            }

            let config = solve_stage(input.freq_hz, &targets, &limits, self.margin).ok_or_else(|| {
                let culprit = first_unsolvable(input.freq_hz, &targets, &limits, self.margin)
                    .unwrap_or(targets.len() - 1);
                let draft = &drafts[members[culprit]];
                let detail = if culprit >= limits.max_outputs {
                    format!(
                        "stage on '{}' supports at most {} outputs",
                        input.name, limits.max_outputs
                    )
                } else {
                    format!(
                        "no {:?} configuration from '{}' ({} Hz) reaches it within {}%",
                        generator.family,
                        input.name,
                        input.freq_hz,
                        self.margin * 100.0
                    )
                };
                ClockError::UnachievableFrequency {
                    domain: draft.request.name.clone(),
                    freq_hz: draft.hz,
                    detail,
                }
            })?;

            for (output, &u) in members.iter().enumerate() {
                let draft = &drafts[u];
                let source = match &draft.request.source {
                    ClockSource::Primary => ClockSource::Input(input.name.clone()),
                    other => other.clone(),
                };
                let domain = ClockDomain {
                    name: draft.request.name.clone(),
                    freq_hz: draft.hz,
                    achieved_hz: config.output_hz(output).round() as u64,
                    divider: config.output_dividers[output],
                    phase: draft.request.phase.clone(),
                    absolute_phase_deg: phases[u],
                    source,
                    stage: new_index,
                    role: draft.request.role,
                };
                debug!(
                    domain = %domain.name,
                    freq_hz = domain.freq_hz,
                    achieved_hz = domain.achieved_hz,
                    divider = domain.divider,
                    stage = new_index,
                    "planned clock domain"
                );
                domains.push(domain);
            }

            plan_stages.push(GenerationStage {
                input: input.name.clone(),
                input_hz: input.freq_hz,
                family: generator.family,
                input_divider: config.input_divider,
                multiplier: config.multiplier,
                vco_hz: config.vco_hz.round() as u64,
                outputs: members
                    .iter()
                    .map(|&u| drafts[u].request.name.clone())
                    .collect(),
            });
        }

        // Keep request order across stages.
        domains.sort_by_key(|d| {
            underlying
                .iter()
                .position(|&u| drafts[u].request.name == d.name)
                .unwrap_or(usize::MAX)
        });

        let reset = ResetLine::for_board(self.board, plan_stages.len());
        Ok(ClockPlan {
            stages: plan_stages,
            domains,
            aliases,
            reset,
        })
    }

    /// Primary input first, then declared stages; each input at most once.
    fn stage_inputs(&self) -> Result<Vec<&'a InputClock>> {
        let primary = self
            .board
            .primary_clock()
            .ok_or_else(|| ClockError::UnknownClockSource {
                domain: SYS_DOMAIN.to_string(),
                source_name: format!("primary input of board '{}'", self.board.name),
            })?;
        let mut inputs = vec![primary];
        for name in &self.declared {
            let clock = self
                .board
                .clock(name)
                .ok_or_else(|| ClockError::UnknownClockSource {
                    domain: format!("stage:{name}"),
                    source_name: name.clone(),
                })?;
            if inputs.iter().any(|c| c.name == clock.name) {
                return Err(ClockError::ConflictingClockSource {
                    input: name.clone(),
                    detail: "input already drives a generation stage".into(),
                });
            }
            inputs.push(clock);
        }
        Ok(inputs)
    }

    fn sys_hz(&self) -> Result<u64> {
        match self.requests.iter().find(|r| r.name == SYS_DOMAIN) {
            Some(request) => match request.frequency {
                Frequency::Hz(hz) => Ok(hz),
                Frequency::SysRatio { .. } => Err(ClockError::InvalidRequest {
                    domain: SYS_DOMAIN.to_string(),
                    detail: "the sys domain needs an absolute frequency".into(),
                }),
            },
            None => Ok(self.board.default_sys_clk_hz),
        }
    }

    /// Resolve frequencies and fold repeated names, in insertion order.
    fn merge_by_name(&self, sys_hz: u64) -> Result<(Vec<Draft<'_>>, BTreeMap<&str, usize>)> {
        let mut drafts: Vec<Draft<'_>> = Vec::new();
        let mut by_name: BTreeMap<&str, usize> = BTreeMap::new();

        for request in &self.requests {
            let hz = request
                .frequency
                .resolve(sys_hz)
                .filter(|&hz| hz > 0)
                .ok_or_else(|| ClockError::InvalidRequest {
                    domain: request.name.clone(),
                    detail: format!("frequency {:?} resolves to zero", request.frequency),
                })?;
            if let Some(phase) = &request.phase {
                if !(0.0..360.0).contains(&phase.degrees) {
                    return Err(ClockError::InvalidRequest {
                        domain: request.name.clone(),
                        detail: format!("phase {} degrees is outside [0, 360)", phase.degrees),
                    });
                }
            }

            if let Some(&existing) = by_name.get(request.name.as_str()) {
                let prior = &drafts[existing];
                let identical = prior.hz == hz
                    && prior.request.phase == request.phase
                    && prior.request.source == request.source
                    && prior.request.role == request.role;
                if identical {
                    continue;
                }
                return Err(ClockError::DuplicateDomain {
                    name: request.name.clone(),
                });
            }
            by_name.insert(request.name.as_str(), drafts.len());
            drafts.push(Draft { request, hz });
        }
        Ok((drafts, by_name))
    }

    /// Follow the source chain of draft `index` to its stage.
    fn stage_of(
        &self,
        index: usize,
        drafts: &[Draft<'_>],
        by_name: &BTreeMap<&str, usize>,
        stage_inputs: &[&InputClock],
    ) -> Result<usize> {
        let mut chain = vec![drafts[index].request.name.clone()];
        let mut current = index;
        loop {
            match &drafts[current].request.source {
                ClockSource::Primary => return Ok(0),
                ClockSource::Input(name) => {
                    if self.board.clock(name).is_none() {
                        return Err(ClockError::UnknownClockSource {
                            domain: drafts[current].request.name.clone(),
                            source_name: name.clone(),
                        });
                    }
                    return stage_inputs
                        .iter()
                        .position(|c| c.name == *name)
                        .ok_or_else(|| ClockError::ConflictingClockSource {
                            input: name.clone(),
                            detail: format!(
                                "domain '{}' is rooted at '{}' while the primary stage is driven by '{}'; declare '{}' as its own stage",
                                drafts[index].request.name, name, stage_inputs[0].name, name
                            ),
                        });
                }
                ClockSource::Domain(name) => {
                    let next = by_name.get(name.as_str()).copied().ok_or_else(|| {
                        ClockError::UnknownClockSource {
                            domain: drafts[current].request.name.clone(),
                            source_name: name.clone(),
                        }
                    })?;
                    let looped = chain.contains(name);
                    chain.push(name.clone());
                    if looped {
                        return Err(ClockError::SourceCycle { chain });
                    }
                    current = next;
                }
            }
        }
    }
}

/// Phase of draft `index` relative to its stage, following reference chains.
fn absolute_phase(
    index: usize,
    drafts: &[Draft<'_>],
    by_name: &BTreeMap<&str, usize>,
    stages: &[usize],
    visited: &mut Vec<usize>,
) -> Result<f64> {
    let Some(phase) = &drafts[index].request.phase else {
        return Ok(0.0);
    };
    let domain = &drafts[index].request.name;
    let invalid = |detail: String| ClockError::InvalidPhaseReference {
        domain: domain.clone(),
        reference: phase.reference.clone(),
        detail,
    };

    let reference = by_name
        .get(phase.reference.as_str())
        .copied()
        .ok_or_else(|| invalid("reference domain is not requested".into()))?;
    if stages[reference] != stages[index] {
        return Err(invalid(format!(
            "reference is generated by stage {}, domain by stage {}",
            stages[reference], stages[index]
        )));
    }
    // Degrees are of one period, so both domains must share it.
    if drafts[reference].hz != drafts[index].hz {
        return Err(invalid(format!(
            "reference runs at {} Hz, domain at {} Hz",
            drafts[reference].hz, drafts[index].hz
        )));
    }
    if visited.contains(&reference) {
        return Err(invalid("phase references form a cycle".into()));
    }
    visited.push(reference);
    let base = absolute_phase(reference, drafts, by_name, stages, visited)?;
    Ok((base + phase.degrees) % 360.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClockError;
    use crate::request::CALIBRATION_HZ;

    fn ddr3_requests(sys_hz: u64) -> Vec<ClockRequest> {
        vec![
            ClockRequest::sys(sys_hz),
            ClockRequest::sys_ratio("sys4x", 4, 1),
            ClockRequest::sys_ratio("sys4x-shifted", 4, 1).with_phase("sys4x", 90.0),
            ClockRequest::calibration("calibration", CALIBRATION_HZ),
        ]
    }

    fn two_clock_board() -> Board {
        let mut board = Board::microphase_a7lite();
        board.clocks.push(InputClock::new("clk125", 125_000_000));
        board
    }

    #[test]
    fn ddr3_plan_has_four_domains_on_one_stage() {
        let board = Board::microphase_a7lite();
        let plan = plan_clocks(&board, &ddr3_requests(50_000_000)).unwrap();
        assert_eq!(plan.len(), 4);
        assert_eq!(plan.stages.len(), 1);
        assert_eq!(plan.stages[0].input, "clk50");
        assert!(plan.domains.iter().all(|d| d.stage == 0));
        assert!(plan
            .domains
            .iter()
            .all(|d| d.source == ClockSource::Input("clk50".into())));

        let shifted = plan.domain("sys4x-shifted").unwrap();
        assert_eq!(shifted.absolute_phase_deg, 90.0);
        assert_eq!(shifted.freq_hz, 200_000_000);

        // Calibration stays separate even though sys4x is also 200 MHz.
        let calibration = plan.domain("calibration").unwrap();
        assert_eq!(calibration.role, DomainRole::Calibration);
        assert!(plan.aliases.is_empty());
    }

    #[test]
    fn domains_keep_request_order() {
        let board = Board::microphase_a7lite();
        let plan = plan_clocks(&board, &ddr3_requests(100_000_000)).unwrap();
        let names: Vec<_> = plan.domains.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["sys", "sys4x", "sys4x-shifted", "calibration"]);
        assert_eq!(plan.stages[0].outputs, names);
    }

    #[test]
    fn achieved_frequencies_are_within_margin() {
        let board = Board::xilinx_kc705();
        let plan = plan_clocks(&board, &ddr3_requests(125_000_000)).unwrap();
        for domain in &plan.domains {
            let error = (domain.achieved_hz as f64 - domain.freq_hz as f64).abs();
            assert!(error <= domain.freq_hz as f64 * DEFAULT_MARGIN, "{}", domain.name);
        }
        let stage = &plan.stages[0];
        assert!(stage.vco_hz >= 600_000_000 && stage.vco_hz <= 1_440_000_000);
    }

    #[test]
    fn identical_domains_are_merged() {
        let board = Board::microphase_a7lite();
        let plan = ClockPlanner::new(&board)
            .request(ClockRequest::sys(50_000_000))
            .request(ClockRequest::hz("eth", 100_000_000))
            .request(ClockRequest::hz("video", 100_000_000))
            .build()
            .unwrap();
        assert_eq!(plan.len(), 2);
        assert_eq!(plan.aliases.get("video").map(String::as_str), Some("eth"));
        assert_eq!(plan.domain("video").unwrap().name, "eth");
    }

    #[test]
    fn repeated_identical_request_is_a_no_op() {
        let board = Board::microphase_a7lite();
        let plan = ClockPlanner::new(&board)
            .request(ClockRequest::sys(50_000_000))
            .request(ClockRequest::sys_ratio("sys4x", 4, 1))
            .request(ClockRequest::sys_ratio("sys4x", 4, 1))
            .build()
            .unwrap();
        assert_eq!(plan.len(), 2);
        assert!(plan.aliases.is_empty());
    }

    #[test]
    fn conflicting_redefinition_is_rejected() {
        let board = Board::microphase_a7lite();
        let err = ClockPlanner::new(&board)
            .request(ClockRequest::sys(50_000_000))
            .request(ClockRequest::sys_ratio("fast", 4, 1))
            .request(ClockRequest::sys_ratio("fast", 2, 1))
            .build()
            .unwrap_err();
        assert_eq!(err, ClockError::DuplicateDomain { name: "fast".into() });
    }

    #[test]
    fn undeclared_second_input_conflicts() {
        let board = two_clock_board();
        let err = ClockPlanner::new(&board)
            .request(ClockRequest::sys(50_000_000))
            .request(ClockRequest::hz("eth", 125_000_000).from_input("clk125"))
            .build()
            .unwrap_err();
        assert!(matches!(err, ClockError::ConflictingClockSource { ref input, .. } if input == "clk125"));
    }

    #[test]
    fn declared_second_input_gets_own_stage() {
        let board = two_clock_board();
        let plan = ClockPlanner::new(&board)
            .declare_stage("clk125")
            .request(ClockRequest::sys(50_000_000))
            .request(ClockRequest::hz("eth", 125_000_000).from_input("clk125"))
            .build()
            .unwrap();
        assert_eq!(plan.stages.len(), 2);
        assert_eq!(plan.domain("eth").unwrap().stage, 1);
        assert_eq!(plan.reset.gates, vec![0, 1]);
    }

    #[test]
    fn declaring_an_input_twice_conflicts() {
        let board = two_clock_board();
        let err = ClockPlanner::new(&board)
            .declare_stage("clk50")
            .build()
            .unwrap_err();
        assert!(matches!(err, ClockError::ConflictingClockSource { .. }));
    }

    #[test]
    fn unknown_input_is_reported() {
        let board = Board::microphase_a7lite();
        let err = ClockPlanner::new(&board)
            .request(ClockRequest::hz("eth", 125_000_000).from_input("clk125"))
            .build()
            .unwrap_err();
        assert!(matches!(err, ClockError::UnknownClockSource { ref source_name, .. } if source_name == "clk125"));
    }

    #[test]
    fn phase_against_other_stage_is_invalid() {
        let board = two_clock_board();
        let err = ClockPlanner::new(&board)
            .declare_stage("clk125")
            .request(ClockRequest::sys(50_000_000))
            .request(ClockRequest::hz("eth", 125_000_000).from_input("clk125"))
            .request(ClockRequest::sys_ratio("sys-shifted", 1, 1).with_phase("eth", 90.0))
            .build()
            .unwrap_err();
        assert!(matches!(err, ClockError::InvalidPhaseReference { ref reference, .. } if reference == "eth"));
    }

    #[test]
    fn phase_against_unknown_domain_is_invalid() {
        let board = Board::microphase_a7lite();
        let err = ClockPlanner::new(&board)
            .request(ClockRequest::sys(50_000_000))
            .request(ClockRequest::sys_ratio("shifted", 4, 1).with_phase("missing", 90.0))
            .build()
            .unwrap_err();
        assert!(matches!(err, ClockError::InvalidPhaseReference { .. }));
    }

    #[test]
    fn phases_accumulate_along_references() {
        let board = Board::microphase_a7lite();
        let plan = ClockPlanner::new(&board)
            .request(ClockRequest::sys(50_000_000))
            .request(ClockRequest::sys_ratio("sys2x", 2, 1))
            .request(ClockRequest::sys_ratio("a", 2, 1).with_phase("sys2x", 270.0))
            .request(ClockRequest::sys_ratio("b", 2, 1).with_phase("a", 180.0))
            .build()
            .unwrap();
        assert_eq!(plan.domain("b").unwrap().absolute_phase_deg, 90.0);
    }

    #[test]
    fn phase_reference_must_share_the_frequency() {
        let board = Board::microphase_a7lite();
        let err = ClockPlanner::new(&board)
            .request(ClockRequest::sys(50_000_000))
            .request(ClockRequest::sys_ratio("a", 2, 1).with_phase("sys", 90.0))
            .build()
            .unwrap_err();
        match err {
            ClockError::InvalidPhaseReference {
                domain,
                reference,
                detail,
            } => {
                assert_eq!(domain, "a");
                assert_eq!(reference, "sys");
                assert!(detail.contains("100000000 Hz"), "{detail}");
            }
            other => panic!("expected InvalidPhaseReference, got {other:?}"),
        }
    }

    #[test]
    fn out_of_range_phase_is_rejected() {
        let board = Board::microphase_a7lite();
        let err = ClockPlanner::new(&board)
            .request(ClockRequest::sys(50_000_000))
            .request(ClockRequest::sys_ratio("a", 2, 1).with_phase("sys", 360.0))
            .build()
            .unwrap_err();
        assert!(matches!(err, ClockError::InvalidRequest { .. }));
    }

    #[test]
    fn domain_sources_share_their_stage() {
        let board = two_clock_board();
        let plan = ClockPlanner::new(&board)
            .declare_stage("clk125")
            .request(ClockRequest::sys(50_000_000))
            .request(ClockRequest::hz("eth", 125_000_000).from_input("clk125"))
            .request(ClockRequest::hz("eth-half", 62_500_000).from_domain("eth"))
            .build()
            .unwrap();
        let half = plan.domain("eth-half").unwrap();
        assert_eq!(half.stage, 1);
        assert_eq!(half.source, ClockSource::Domain("eth".into()));
    }

    #[test]
    fn cyclic_source_chain_is_rejected() {
        let board = Board::microphase_a7lite();
        let err = ClockPlanner::new(&board)
            .request(ClockRequest::hz("a", 50_000_000).from_domain("b"))
            .request(ClockRequest::hz("b", 50_000_000).from_domain("a"))
            .build()
            .unwrap_err();
        match err {
            ClockError::SourceCycle { chain } => assert_eq!(chain, vec!["a", "b", "a"]),
            other => panic!("expected SourceCycle, got {other:?}"),
        }
    }

    #[test]
    fn unknown_domain_source_is_reported() {
        let board = Board::microphase_a7lite();
        let err = ClockPlanner::new(&board)
            .request(ClockRequest::hz("a", 50_000_000).from_domain("ghost"))
            .build()
            .unwrap_err();
        assert!(matches!(err, ClockError::UnknownClockSource { .. }));
    }

    #[test]
    fn unreachable_frequency_names_the_domain() {
        let board = Board::microphase_a7lite();
        let err = ClockPlanner::new(&board)
            .request(ClockRequest::sys(50_000_000))
            .request(ClockRequest::hz("too-fast", 3_000_000_000))
            .build()
            .unwrap_err();
        assert!(matches!(err, ClockError::UnachievableFrequency { ref domain, .. } if domain == "too-fast"));
    }

    #[test]
    fn too_many_outputs_names_the_overflow() {
        let board = Board::microphase_a7lite();
        // Same frequency, distinct phases: nothing merges.
        let planner = (1..7).fold(
            ClockPlanner::new(&board).request(ClockRequest::hz("d0", 50_000_000)),
            |p, i| p.request(ClockRequest::hz(format!("d{i}"), 50_000_000).with_phase("d0", i as f64 * 10.0)),
        );
        let err = planner.build().unwrap_err();
        assert!(matches!(err, ClockError::UnachievableFrequency { ref domain, .. } if domain == "d6"));
    }

    #[test]
    fn bypass_board_only_passes_input() {
        let board = Board::mlkpai_fs01_dr1v90m();
        let plan = plan_clocks(&board, &[ClockRequest::sys(25_000_000)]).unwrap();
        assert_eq!(plan.domain("sys").unwrap().achieved_hz, 25_000_000);

        let err = plan_clocks(
            &board,
            &[ClockRequest::sys(25_000_000), ClockRequest::sys_ratio("sys2x", 2, 1)],
        )
        .unwrap_err();
        assert!(matches!(err, ClockError::UnachievableFrequency { .. }));
    }

    #[test]
    fn bypass_board_rejects_phase() {
        let board = Board::mlkpai_fs01_dr1v90m();
        let err = plan_clocks(
            &board,
            &[
                ClockRequest::sys(25_000_000),
                ClockRequest::sys_ratio("shifted", 1, 1).with_phase("sys", 90.0),
            ],
        )
        .unwrap_err();
        assert!(matches!(err, ClockError::UnachievableFrequency { .. }));
    }

    #[test]
    fn calibration_must_be_on_primary_stage() {
        let board = two_clock_board();
        let err = ClockPlanner::new(&board)
            .declare_stage("clk125")
            .request(ClockRequest::calibration("calibration", CALIBRATION_HZ).from_input("clk125"))
            .build()
            .unwrap_err();
        assert!(matches!(err, ClockError::InvalidRequest { .. }));
    }

    #[test]
    fn sys_defaults_to_board_frequency() {
        let board = Board::xilinx_kc705();
        let plan = plan_clocks(&board, &[ClockRequest::sys_ratio("sys2x", 2, 1)]).unwrap();
        assert_eq!(plan.domain("sys2x").unwrap().freq_hz, 250_000_000);
    }

    #[test]
    fn unused_declared_stage_is_dropped() {
        let board = two_clock_board();
        let plan = ClockPlanner::new(&board)
            .declare_stage("clk125")
            .request(ClockRequest::sys(50_000_000))
            .build()
            .unwrap();
        assert_eq!(plan.stages.len(), 1);
    }

    #[test]
    fn planning_is_deterministic() {
        let board = Board::hyvision_pcie_opt01_revf();
        let requests = vec![
            ClockRequest::sys(100_000_000),
            ClockRequest::sys_ratio("sys2x", 2, 1),
            ClockRequest::sys_ratio("sys2x-shifted", 2, 1).with_phase("sys2x", 90.0),
            ClockRequest::calibration("calibration", CALIBRATION_HZ),
            ClockRequest::hz("eth", 200_000_000),
        ];
        let a = plan_clocks(&board, &requests).unwrap();
        let b = plan_clocks(&board, &requests).unwrap();
        assert_eq!(a, b);
        // sys2x and eth are both 200 MHz at phase 0 on the same stage.
        assert_eq!(a.aliases.get("eth").map(String::as_str), Some("sys2x"));
    }

    #[test]
    fn constraints_cover_inputs_domains_and_reset_path() {
        let board = Board::microphase_a7lite();
        let plan = plan_clocks(&board, &ddr3_requests(50_000_000)).unwrap();
        let constraints = plan.constraints();
        assert_eq!(constraints.len(), 1 + 4 + 1);
        assert!(constraints.contains(&crate::plan::TimingConstraint::FalsePath {
            from: "sys".into(),
            to: "clk50".into(),
        }));
    }

    #[test]
    fn gatemate_reaches_sys_and_video() {
        let board = Board::olimex_gatemate_a1_evb();
        let plan = plan_clocks(
            &board,
            &[ClockRequest::sys(24_000_000), ClockRequest::hz("vga", 65_000_000)],
        )
        .unwrap();
        assert_eq!(plan.len(), 2);
    }
}
