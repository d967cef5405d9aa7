// Copyright 2016 Vernon Jones.
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! HTTP facade wiring the index/search library onto a small JSON API.

pub mod http;
