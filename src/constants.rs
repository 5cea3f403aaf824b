// Copyright 2026 Finguard Contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

/// Displayed confidence never exceeds this cap.
pub const CONFIDENCE_CAP: f32 = 0.95;

/// A response counts as verified when the uncapped mean similarity of its
/// supporting sources exceeds this threshold. The threshold is checked
/// before the display cap is applied.
pub const VERIFICATION_THRESHOLD: f32 = 0.7;

/// Number of hits used when fact-checking a response.
pub const FACT_CHECK_TOP_K: usize = 3;

/// Default number of hits returned by retrieval.
pub const DEFAULT_TOP_K: usize = 5;

/// Number of top hits folded into the drafting context.
pub const CONTEXT_SOURCES: usize = 3;

/// Nominal similarity assigned to fallback keyword matches, which carry no
/// ranking signal of their own.
pub const FALLBACK_SIMILARITY: f32 = 0.5;

/// Length of source content previews in fact-check reports.
pub const PREVIEW_CHARS: usize = 200;
