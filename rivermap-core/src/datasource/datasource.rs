//
// Copyright (c) rivermap contributors. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

use crate::core::feature::Feature;
use crate::error::Result;

pub trait DatasourceType {
    /// Description for log output
    fn info(&self) -> String;
    /// EPSG code of the coordinates, `None` when it cannot be determined
    fn srid(&self) -> Result<Option<i32>>;
    /// Read all features in storage order. Returns the number of features read.
    fn retrieve_features<F>(&self, read: F) -> Result<u64>
    where
        F: FnMut(Feature);
}
