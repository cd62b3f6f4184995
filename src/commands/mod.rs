// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod transactions;
pub mod sales;
pub mod inventory;
pub mod alerts;
pub mod reports;
pub mod importer;
pub mod doctor;
