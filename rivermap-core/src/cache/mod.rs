//
// Copyright (c) rivermap contributors. All rights reserved.
// Licensed under the MIT License. See LICENSE file in the project root for full license information.
//

pub mod datasetcache;
pub mod fetcher;


pub use self::datasetcache::DatasetCache;
pub use self::fetcher::{Fetcher, HttpFetcher};
